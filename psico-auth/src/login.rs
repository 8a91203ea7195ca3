//! Login and logout.
//!
//! Login sends users to the host they belong on: the global administrator
//! signs in on the root domain only, clinic users on their clinic's
//! `-app` subdomain only. A user on the wrong host gets the right login URL
//! back and no request is made.

use psico_core::errors::{ErrorKind, PsicoError};
use psico_core::events::LOGIN_ROUTE;
use psico_core::session::{keys, UserProfile};
use psico_core::{Role, SessionEvent, TenantCatalog};
use psico_http::ApiClient;
use thiserror::Error;

use crate::options::AuthOptions;

pub const INVALID_CREDENTIALS: &str = "Credenciales incorrectas.";

const CREDENTIAL_KEYS: &[&str] = &[keys::AUTH_TOKEN, keys::ACCESS_TOKEN];
const GLOBAL_ADMIN_KEYS: &[&str] = &[
    keys::AUTH_TOKEN,
    keys::ACCESS_TOKEN,
    keys::USER_TYPE,
    keys::CURRENT_USER,
];

#[derive(Debug, Error)]
pub enum LoginError {
    /// The backend answered and refused the credentials.
    #[error("{0}")]
    Rejected(String),
    #[error("Error de red o el servidor no responde.")]
    Unreachable(#[source] anyhow::Error),
    /// Login succeeded but the session could not be written.
    #[error("could not store session: {0}")]
    Session(#[source] anyhow::Error),
}

impl LoginError {
    fn from_request(err: anyhow::Error) -> Self {
        match PsicoError::from_anyhow(&err) {
            Some(pe) if !matches!(pe.kind, ErrorKind::Network | ErrorKind::Timeout) => {
                let message = pe
                    .errors
                    .as_ref()
                    .and_then(|e| e.get("non_field_errors"))
                    .and_then(|v| v.get(0))
                    .and_then(|v| v.as_str())
                    .unwrap_or(INVALID_CREDENTIALS);
                LoginError::Rejected(message.to_string())
            }
            _ => LoginError::Unreachable(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated {
        role: Option<Role>,
        landing: String,
        user: UserProfile,
    },
    /// Wrong host for this account; the host should send the user here.
    WrongHost { login_url: String },
}

/// First page after login.
pub fn landing_route(role: Option<Role>, global_context: bool) -> &'static str {
    match role {
        Some(r) if r.is_admin_like() => {
            if global_context {
                "/global-admin"
            } else {
                "/admin-dashboard"
            }
        }
        Some(Role::Professional) => "/psychologist-dashboard",
        _ => "/dashboard",
    }
}

/// What each area's logout removes from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutScope {
    Patient,
    Professional,
    GlobalAdmin,
    ClinicAdmin,
}

impl LogoutScope {
    pub fn for_role(role: Option<Role>, global_context: bool) -> Self {
        match role {
            Some(Role::Professional) => LogoutScope::Professional,
            Some(r) if r.is_admin_like() && global_context => LogoutScope::GlobalAdmin,
            Some(r) if r.is_admin_like() => LogoutScope::ClinicAdmin,
            _ => LogoutScope::Patient,
        }
    }

    /// Keys removed; `None` means the whole store is cleared.
    pub fn keys(&self) -> Option<&'static [&'static str]> {
        match self {
            LogoutScope::Patient | LogoutScope::Professional => Some(CREDENTIAL_KEYS),
            LogoutScope::GlobalAdmin => Some(GLOBAL_ADMIN_KEYS),
            LogoutScope::ClinicAdmin => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginFlow {
    client: ApiClient,
    options: AuthOptions,
    catalog: TenantCatalog,
}

impl LoginFlow {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            options: AuthOptions::default(),
            catalog: TenantCatalog::default(),
        }
    }

    pub fn with_options(mut self, options: AuthOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_catalog(mut self, catalog: TenantCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn options(&self) -> &AuthOptions {
        &self.options
    }

    /// The host has no clinic of its own.
    pub fn is_global_context(&self) -> bool {
        let resolved = self.client.resolver().resolve(self.client.hostname());
        self.catalog.is_global_admin_context(resolved.as_ref())
    }

    /// Where `email` must log in, if not on this host.
    pub fn redirect_for(&self, email: &str) -> Option<String> {
        let on_root = self.options.is_root_host(self.client.hostname());
        let global_admin = self.options.is_global_admin(email);
        match (global_admin, on_root) {
            (true, false) => Some(self.options.root_login_url()),
            (false, true) => self.options.clinic_login_url(email),
            _ => None,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        if let Some(login_url) = self.redirect_for(email) {
            tracing::info!(host = %self.client.hostname(), %login_url, "login attempted on the wrong host");
            return Ok(LoginOutcome::WrongHost { login_url });
        }

        let global = self.options.is_global_admin(email) && self.options.is_root_host(self.client.hostname());
        let auth = self.client.auth();
        let response = if global {
            auth.login_global(email, password).await
        } else {
            auth.login(email, password).await
        }
        .map_err(LoginError::from_request)?;

        let record = response.into_record();
        let session = self.client.session();
        session.store_login(&record).map_err(LoginError::Session)?;

        let role = record.user.user_type.parse::<Role>().ok();
        let landing = landing_route(role, self.is_global_context()).to_string();

        tracing::info!(role = %record.user.user_type, %landing, "logged in");
        self.client.events().emit(&SessionEvent::LoggedIn {
            role: record.user.user_type.clone(),
        });

        Ok(LoginOutcome::Authenticated {
            role,
            landing,
            user: record.user,
        })
    }

    /// Log out with the clean-up matching the stored role and host.
    pub fn logout(&self) -> anyhow::Result<LogoutScope> {
        let scope = LogoutScope::for_role(self.client.session().role(), self.is_global_context());
        self.logout_scope(scope)?;
        Ok(scope)
    }

    pub fn logout_scope(&self, scope: LogoutScope) -> anyhow::Result<()> {
        let session = self.client.session();
        match scope.keys() {
            Some(names) => session.remove_keys(names)?,
            None => session.clear_all()?,
        }
        tracing::info!(?scope, "logged out");
        self.client.events().emit(&SessionEvent::LoggedOut {
            redirect_to: LOGIN_ROUTE.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_routes() {
        assert_eq!(landing_route(Some(Role::Superuser), true), "/global-admin");
        assert_eq!(landing_route(Some(Role::Admin), false), "/admin-dashboard");
        assert_eq!(landing_route(Some(Role::Professional), false), "/psychologist-dashboard");
        assert_eq!(landing_route(Some(Role::Patient), true), "/dashboard");
        assert_eq!(landing_route(None, false), "/dashboard");
    }

    #[test]
    fn logout_scopes_follow_role_and_context() {
        assert_eq!(LogoutScope::for_role(Some(Role::Admin), true), LogoutScope::GlobalAdmin);
        assert_eq!(LogoutScope::for_role(Some(Role::Superuser), false), LogoutScope::ClinicAdmin);
        assert_eq!(LogoutScope::for_role(Some(Role::Professional), true), LogoutScope::Professional);
        assert_eq!(LogoutScope::for_role(None, false), LogoutScope::Patient);
        assert!(LogoutScope::ClinicAdmin.keys().is_none());
    }

    #[test]
    fn rejection_messages() {
        let err = PsicoError::bad_request("x")
            .with_errors(serde_json::json!({"non_field_errors": ["Cuenta inactiva."]}))
            .into_anyhow();
        assert_eq!(LoginError::from_request(err).to_string(), "Cuenta inactiva.");

        let err = PsicoError::forbidden("nope").into_anyhow();
        assert_eq!(LoginError::from_request(err).to_string(), INVALID_CREDENTIALS);

        let err = PsicoError::network("down").into_anyhow();
        assert!(matches!(LoginError::from_request(err), LoginError::Unreachable(_)));
    }
}
