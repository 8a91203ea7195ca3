//! Navigation gating on the stored session.
//!
//! Order of checks:
//! 1. no credential → `/login`
//! 2. no role required → render
//! 3. role mismatch → `/` (`admin` accepts `superuser`)
//! 4. patients only: outstanding triage forces `/triage`, and a finished
//!    triage bounces `/triage` to `/dashboard`
//!
//! Nothing is cached; every call reads the store again.

use std::collections::BTreeMap;

use psico_core::events::LOGIN_ROUTE;
use psico_core::{Role, Session};

use crate::routes::RouteTable;

pub const HOME_ROUTE: &str = "/";
pub const TRIAGE_ROUTE: &str = "/triage";
pub const PATIENT_HOME_ROUTE: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(String),
}

impl GuardDecision {
    fn to(path: &str) -> Self {
        GuardDecision::Redirect(path.to_string())
    }

    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardDecision::Render => None,
            GuardDecision::Redirect(p) => Some(p),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `path`, requiring `required`, may render for the
    /// current session.
    pub fn evaluate(&self, session: &Session, required: Option<Role>, path: &str) -> GuardDecision {
        if !session.has_credential() {
            tracing::debug!(path, "no credential, redirecting to login");
            return GuardDecision::to(LOGIN_ROUTE);
        }

        let Some(required) = required else {
            return GuardDecision::Render;
        };

        let stored = session.role();
        if !stored.is_some_and(|r| r.satisfies(required)) {
            tracing::debug!(path, required = %required, stored = ?session.role_tag(), "role mismatch");
            return GuardDecision::to(HOME_ROUTE);
        }

        if stored == Some(Role::Patient) {
            let needs_triage = !session.triage_completed();
            let on_triage = normalize_path(path) == TRIAGE_ROUTE;
            if needs_triage && !on_triage {
                tracing::debug!(path, "triage outstanding");
                return GuardDecision::to(TRIAGE_ROUTE);
            }
            if !needs_triage && on_triage {
                return GuardDecision::to(PATIENT_HOME_ROUTE);
            }
        }

        GuardDecision::Render
    }
}

fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub decision: GuardDecision,
    pub params: BTreeMap<String, String>,
}

/// Route table + guard. Unknown paths redirect home, public routes render
/// without any session check.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    table: RouteTable,
    guard: RouteGuard,
}

impl Navigator {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            guard: RouteGuard,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn navigate(&self, session: &Session, path: &str) -> Navigation {
        let Some(found) = self.table.lookup(path) else {
            return Navigation {
                decision: GuardDecision::to(HOME_ROUTE),
                params: BTreeMap::new(),
            };
        };

        let decision = match found.entry.required_role() {
            None => GuardDecision::Render,
            Some(role) => self.guard.evaluate(session, Some(role), path),
        };
        Navigation {
            decision,
            params: found.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psico_core::session::keys;
    use psico_core::MemorySessionStore;
    use std::sync::Arc;

    fn session(entries: &[(&str, &str)]) -> Session {
        Session::new(Arc::new(MemorySessionStore::with_entries(entries.iter().copied())))
    }

    #[test]
    fn missing_credential_goes_to_login() {
        let s = session(&[(keys::USER_TYPE, "admin")]);
        assert_eq!(RouteGuard.evaluate(&s, None, "/x"), GuardDecision::Redirect("/login".into()));
    }

    #[test]
    fn unknown_role_tag_never_satisfies() {
        let s = session(&[(keys::AUTH_TOKEN, "t"), (keys::USER_TYPE, "root")]);
        assert_eq!(
            RouteGuard.evaluate(&s, Some(Role::Admin), "/admin-dashboard"),
            GuardDecision::Redirect("/".into())
        );
        assert!(RouteGuard.evaluate(&s, None, "/anything").is_render());
    }

    #[test]
    fn triage_path_normalization() {
        assert_eq!(normalize_path("/triage/"), "/triage");
        assert_eq!(normalize_path("/triage?step=2"), "/triage");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn navigator_redirects_unknown_and_renders_public() {
        let nav = Navigator::default();
        let anon = session(&[]);
        assert_eq!(nav.navigate(&anon, "/nowhere").decision, GuardDecision::Redirect("/".into()));
        assert!(nav.navigate(&anon, "/login").decision.is_render());
        assert_eq!(
            nav.navigate(&anon, "/my-journal").decision.redirect_target(),
            Some("/login")
        );
    }
}
