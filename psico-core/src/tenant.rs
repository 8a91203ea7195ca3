//! Multi-tenant types and hostname-based tenant resolution.
//!
//! A tenant is one clinic's namespace. The root domain (and loopback) is the
//! global context and has no tenant at all; that is a valid answer, not a
//! failure.
//!
//! Resolution is data-driven: a [`TenantResolver`] walks an ordered list of
//! [`TenantRule`]s and the first rule that reaches a decision wins.
//!
//! ```rust
//! use psico_core::tenant::{TenantId, TenantResolver};
//!
//! let resolver = TenantResolver::default();
//! assert_eq!(resolver.resolve("psicoadmin.xyz"), None);
//! assert_eq!(
//!     resolver.resolve("mindcare-app.psicoadmin.xyz"),
//!     Some(TenantId::from("mindcare"))
//! );
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ROOT_DOMAIN: &str = "psicoadmin.xyz";
pub const DEFAULT_PREVIEW_DOMAIN: &str = "vercel.app";
pub const DEFAULT_FALLBACK_TENANT: &str = "bienestar";

/// A clinic identifier (the backend's schema name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new<S: Into<String>>(slug: S) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the effective tenant of a request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantSource {
    /// Explicit preference stored in the session (`selectedTenant`).
    Selected,
    /// Derived from the hostname.
    Hostname,
}

/// The tenant a request is scoped to. `tenant == None` is the global context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant: Option<TenantId>,
    pub source: Option<TenantSource>,
}

impl TenantContext {
    pub fn global() -> Self {
        Self {
            tenant: None,
            source: None,
        }
    }

    pub fn new<S: Into<String>>(tenant: S) -> Self {
        Self {
            tenant: Some(TenantId(tenant.into())),
            source: Some(TenantSource::Selected),
        }
    }

    /// A stored preference wins over the host-derived tenant. Empty or
    /// whitespace-only preferences count as absent.
    pub fn effective(selected: Option<&str>, resolved: Option<TenantId>) -> Self {
        if let Some(sel) = selected.map(str::trim).filter(|s| !s.is_empty()) {
            return Self {
                tenant: Some(TenantId::from(sel)),
                source: Some(TenantSource::Selected),
            };
        }
        match resolved {
            Some(t) => Self {
                tenant: Some(t),
                source: Some(TenantSource::Hostname),
            },
            None => Self::global(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.tenant.is_none()
    }

    pub fn tenant_str(&self) -> Option<&str> {
        self.tenant.as_ref().map(TenantId::as_str)
    }
}

/// Which hostnames a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMatcher {
    /// Host equals one of these.
    Exact(Vec<String>),
    /// Host contains this fragment.
    Contains(String),
}

impl HostMatcher {
    fn matches(&self, host: &str) -> bool {
        match self {
            HostMatcher::Exact(hosts) => hosts.iter().any(|h| h == host),
            HostMatcher::Contains(fragment) => host.contains(fragment.as_str()),
        }
    }
}

/// What a matching rule decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantPick {
    /// Global context, no tenant.
    Root,
    /// First known clinic appearing anywhere in the host; undecided if none.
    Substring,
    /// First dot-separated label, if the host has several labels and the
    /// label is a known clinic; undecided otherwise.
    FirstLabel,
    /// Like `Substring`, but falls back to a fixed tenant instead of passing.
    SubstringOr(TenantId),
}

/// Outcome of evaluating one rule against a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Root,
    Tenant(TenantId),
}

impl Resolution {
    pub fn into_tenant(self) -> Option<TenantId> {
        match self {
            Resolution::Root => None,
            Resolution::Tenant(t) => Some(t),
        }
    }
}

/// A predicate/result pair in the resolver's rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRule {
    pub name: String,
    pub matcher: HostMatcher,
    pub pick: TenantPick,
}

impl TenantRule {
    pub fn new(name: impl Into<String>, matcher: HostMatcher, pick: TenantPick) -> Self {
        Self {
            name: name.into(),
            matcher,
            pick,
        }
    }

    /// `None` means the rule does not decide and evaluation continues.
    pub fn apply(&self, host: &str, clinics: &[TenantId]) -> Option<Resolution> {
        if !self.matcher.matches(host) {
            return None;
        }
        match &self.pick {
            TenantPick::Root => Some(Resolution::Root),
            TenantPick::Substring => substring_match(host, clinics).map(Resolution::Tenant),
            TenantPick::FirstLabel => {
                let mut labels = host.split('.');
                let first = labels.next()?;
                labels.next()?;
                clinics
                    .iter()
                    .find(|c| c.as_str() == first)
                    .cloned()
                    .map(Resolution::Tenant)
            }
            TenantPick::SubstringOr(fallback) => Some(Resolution::Tenant(
                substring_match(host, clinics).unwrap_or_else(|| fallback.clone()),
            )),
        }
    }
}

fn substring_match(host: &str, clinics: &[TenantId]) -> Option<TenantId> {
    clinics.iter().find(|c| host.contains(c.as_str())).cloned()
}

/// Lowercase, drop a trailing dot and a `:port` suffix.
pub fn normalize_host(hostname: &str) -> String {
    let mut host = hostname.trim().to_ascii_lowercase();
    if !host.starts_with('[') {
        if let Some((name, port)) = host.rsplit_once(':') {
            if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
                host = name.to_string();
            }
        }
    }
    while host.ends_with('.') {
        host.pop();
    }
    host
}

/// Loopback / localhost hosts used during local development.
pub fn is_local_development(hostname: &str) -> bool {
    let host = normalize_host(hostname);
    host.contains("localhost") || host.contains("127.0.0.1")
}

/// Ordered rule table + the clinics rules may pick from.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    rules: Vec<TenantRule>,
    clinics: Vec<TenantId>,
    root_domain: String,
}

impl Default for TenantResolver {
    fn default() -> Self {
        Self::for_domain(
            DEFAULT_ROOT_DOMAIN,
            ["mindcare", "bienestar"],
            DEFAULT_PREVIEW_DOMAIN,
            DEFAULT_FALLBACK_TENANT,
        )
    }
}

impl TenantResolver {
    /// Build from an explicit rule table.
    pub fn new<I, T>(root_domain: impl Into<String>, clinics: I, rules: Vec<TenantRule>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TenantId>,
    {
        Self {
            rules,
            clinics: clinics.into_iter().map(Into::into).collect(),
            root_domain: root_domain.into(),
        }
    }

    /// The standard rule table for a deployment under `root_domain`.
    pub fn for_domain<I, T>(
        root_domain: &str,
        clinics: I,
        preview_domain: &str,
        preview_fallback: &str,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TenantId>,
    {
        let root = root_domain.to_ascii_lowercase();
        let rules = vec![
            TenantRule::new(
                "root-host",
                HostMatcher::Exact(vec![
                    root.clone(),
                    format!("www.{root}"),
                    "localhost".to_string(),
                    "127.0.0.1".to_string(),
                ]),
                TenantPick::Root,
            ),
            TenantRule::new(
                "app-subdomain",
                HostMatcher::Contains(format!("-app.{root}")),
                TenantPick::Substring,
            ),
            TenantRule::new(
                "direct-subdomain",
                HostMatcher::Contains(format!(".{root}")),
                TenantPick::FirstLabel,
            ),
            TenantRule::new(
                "local-subdomain",
                HostMatcher::Contains("localhost".to_string()),
                TenantPick::FirstLabel,
            ),
            TenantRule::new(
                "preview-deployment",
                HostMatcher::Contains(preview_domain.to_ascii_lowercase()),
                TenantPick::SubstringOr(TenantId::from(preview_fallback)),
            ),
        ];
        Self::new(root, clinics, rules)
    }

    pub fn rules(&self) -> &[TenantRule] {
        &self.rules
    }

    pub fn clinics(&self) -> &[TenantId] {
        &self.clinics
    }

    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// True for the bare root domain and its `www.` alias (not loopback).
    pub fn is_root_host(&self, hostname: &str) -> bool {
        let host = normalize_host(hostname);
        host == self.root_domain || host == format!("www.{}", self.root_domain)
    }

    /// Tenant for `hostname`, or `None` for the global context.
    pub fn resolve(&self, hostname: &str) -> Option<TenantId> {
        self.explain(hostname).0.into_tenant()
    }

    /// Resolution plus the name of the rule that decided (None when no
    /// rule matched and the default applied).
    pub fn explain(&self, hostname: &str) -> (Resolution, Option<&str>) {
        let host = normalize_host(hostname);
        for rule in &self.rules {
            if let Some(res) = rule.apply(&host, &self.clinics) {
                tracing::trace!(host = %host, rule = %rule.name, "tenant rule matched");
                return (res, Some(rule.name.as_str()));
            }
        }
        (Resolution::Root, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Option<TenantId> {
        Some(TenantId::from(s))
    }

    #[test]
    fn root_hosts_have_no_tenant() {
        let r = TenantResolver::default();
        for host in ["psicoadmin.xyz", "www.psicoadmin.xyz", "localhost", "127.0.0.1"] {
            assert_eq!(r.resolve(host), None, "{host}");
        }
    }

    #[test]
    fn app_subdomains_pick_the_clinic() {
        let r = TenantResolver::default();
        assert_eq!(r.resolve("bienestar-app.psicoadmin.xyz"), t("bienestar"));
        assert_eq!(r.resolve("mindcare-app.psicoadmin.xyz"), t("mindcare"));
    }

    #[test]
    fn unknown_app_subdomain_falls_through_to_root() {
        let r = TenantResolver::default();
        let (res, rule) = r.explain("other-app.psicoadmin.xyz");
        assert_eq!(res, Resolution::Root);
        assert_eq!(rule, None);
    }

    #[test]
    fn direct_and_local_subdomains() {
        let r = TenantResolver::default();
        assert_eq!(r.resolve("mindcare.psicoadmin.xyz"), t("mindcare"));
        assert_eq!(r.resolve("bienestar.localhost"), t("bienestar"));
        assert_eq!(r.resolve("unknown.localhost"), None);
        assert_eq!(r.resolve("bienestar.localhost:5173"), t("bienestar"));
    }

    #[test]
    fn preview_deployments_fall_back() {
        let r = TenantResolver::default();
        assert_eq!(r.resolve("psico-mindcare-git-main.vercel.app"), t("mindcare"));
        assert_eq!(r.resolve("psico-frontend.vercel.app"), t("bienestar"));
    }

    #[test]
    fn unknown_hosts_are_global_and_stable() {
        let r = TenantResolver::default();
        assert_eq!(r.resolve("example.com"), None);
        assert_eq!(r.resolve(""), None);
        assert_eq!(r.resolve("MindCare-App.PsicoAdmin.XYZ."), r.resolve("mindcare-app.psicoadmin.xyz"));
        let first = r.resolve("mindcare-app.psicoadmin.xyz");
        assert_eq!(first, r.resolve("mindcare-app.psicoadmin.xyz"));
    }

    #[test]
    fn selected_tenant_wins_over_hostname() {
        let ctx = TenantContext::effective(Some("mindcare"), t("bienestar"));
        assert_eq!(ctx.tenant_str(), Some("mindcare"));
        assert_eq!(ctx.source, Some(TenantSource::Selected));

        let ctx = TenantContext::effective(Some("  "), t("bienestar"));
        assert_eq!(ctx.source, Some(TenantSource::Hostname));

        assert!(TenantContext::effective(None, None).is_global());
    }

    #[test]
    fn custom_rule_tables_are_honoured() {
        let r = TenantResolver::new(
            "clinic.test",
            ["alpha"],
            vec![TenantRule::new(
                "everything-alpha",
                HostMatcher::Contains(".test".into()),
                TenantPick::SubstringOr(TenantId::from("alpha")),
            )],
        );
        assert_eq!(r.resolve("x.clinic.test"), t("alpha"));
        assert_eq!(r.resolve("x.example"), None);
    }
}
