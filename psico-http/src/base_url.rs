//! Backend origin selection.
//!
//! Order of precedence:
//! 1. a non-empty explicit override
//! 2. local development hosts: `http://localhost:<port>/api` for the global
//!    context, `http://<tenant>.localhost:<port>/api` for a clinic
//! 3. deployed hosts: one centralized origin; the tenant travels in the
//!    `X-Tenant-Schema` header instead of the URL
//!
//! Building never fails.

use psico_core::tenant::{is_local_development, normalize_host, TenantId, DEFAULT_ROOT_DOMAIN};
use psico_core::TenantResolver;

pub const DEFAULT_CENTRAL_ORIGIN: &str = "https://psico-admin.onrender.com";
pub const DEFAULT_LOCAL_PORT: u16 = 8000;
pub const DEFAULT_API_PATH: &str = "/api";

/// How deployed hosts reach the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductionRouting {
    /// Every deployed host talks to the central origin.
    #[default]
    Centralized,
    /// Older scheme: each clinic has its own backend subdomain.
    PerTenantSubdomain,
}

impl std::str::FromStr for ProductionRouting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "centralized" | "central" => Ok(ProductionRouting::Centralized),
            "per-tenant" | "per_tenant" | "subdomain" => Ok(ProductionRouting::PerTenantSubdomain),
            other => Err(anyhow::anyhow!("unknown production routing '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BaseUrlBuilder {
    override_url: Option<String>,
    central_origin: String,
    local_port: u16,
    api_path: String,
    root_domain: String,
    routing: ProductionRouting,
}

impl Default for BaseUrlBuilder {
    fn default() -> Self {
        Self {
            override_url: None,
            central_origin: DEFAULT_CENTRAL_ORIGIN.to_string(),
            local_port: DEFAULT_LOCAL_PORT,
            api_path: DEFAULT_API_PATH.to_string(),
            root_domain: DEFAULT_ROOT_DOMAIN.to_string(),
            routing: ProductionRouting::Centralized,
        }
    }
}

impl BaseUrlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank overrides are ignored.
    pub fn with_override(mut self, url: Option<impl Into<String>>) -> Self {
        self.override_url = url
            .map(Into::into)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }

    pub fn with_central_origin(mut self, origin: impl Into<String>) -> Self {
        self.central_origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_local_port(mut self, port: u16) -> Self {
        self.local_port = port;
        self
    }

    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.api_path = if path.starts_with('/') { path } else { format!("/{path}") };
        self
    }

    pub fn with_root_domain(mut self, root: impl Into<String>) -> Self {
        self.root_domain = root.into().to_ascii_lowercase();
        self
    }

    pub fn with_routing(mut self, routing: ProductionRouting) -> Self {
        self.routing = routing;
        self
    }

    pub fn override_url(&self) -> Option<&str> {
        self.override_url.as_deref()
    }

    pub fn routing(&self) -> ProductionRouting {
        self.routing
    }

    /// Base URL for a page served from `hostname` whose resolved tenant is
    /// `tenant`.
    pub fn build(&self, hostname: &str, tenant: Option<&TenantId>) -> String {
        if let Some(url) = &self.override_url {
            return url.clone();
        }

        if is_local_development(hostname) {
            return match tenant {
                None => format!("http://localhost:{}{}", self.local_port, self.api_path),
                Some(t) => format!("http://{}.localhost:{}{}", t, self.local_port, self.api_path),
            };
        }

        match (self.routing, tenant) {
            (ProductionRouting::PerTenantSubdomain, Some(t)) => self.per_tenant(hostname, t),
            _ => format!("{}{}", self.central_origin, self.api_path),
        }
    }

    /// Resolve the tenant with `resolver`, then build.
    pub fn build_for_host(&self, hostname: &str, resolver: &TenantResolver) -> String {
        let tenant = resolver.resolve(hostname);
        self.build(hostname, tenant.as_ref())
    }

    fn per_tenant(&self, hostname: &str, tenant: &TenantId) -> String {
        let host = normalize_host(hostname);
        if host.contains(&format!("-app.{}", self.root_domain)) {
            let backend_host = host.replacen("-app", "", 1);
            return format!("https://{}{}", backend_host, self.api_path);
        }
        format!("https://{}.{}{}", tenant, self.root_domain, self.api_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TenantId {
        TenantId::from(s)
    }

    #[test]
    fn override_always_wins() {
        let b = BaseUrlBuilder::new().with_override(Some("https://staging.example/api"));
        assert_eq!(b.build("bienestar.localhost", Some(&t("bienestar"))), "https://staging.example/api");
        assert_eq!(b.build("psicoadmin.xyz", None), "https://staging.example/api");
    }

    #[test]
    fn blank_override_is_ignored() {
        let b = BaseUrlBuilder::new().with_override(Some("   "));
        assert_eq!(b.override_url(), None);
        assert_eq!(b.build("localhost", None), "http://localhost:8000/api");
    }

    #[test]
    fn local_hosts_use_local_origins() {
        let b = BaseUrlBuilder::new();
        assert_eq!(b.build("127.0.0.1", None), "http://localhost:8000/api");
        assert_eq!(
            b.build("mindcare.localhost", Some(&t("mindcare"))),
            "http://mindcare.localhost:8000/api"
        );
        assert_eq!(
            b.clone().with_local_port(9000).build("localhost", Some(&t("x"))),
            "http://x.localhost:9000/api"
        );
    }

    #[test]
    fn deployed_hosts_are_centralized() {
        let b = BaseUrlBuilder::new();
        let central = "https://psico-admin.onrender.com/api";
        assert_eq!(b.build("psicoadmin.xyz", None), central);
        assert_eq!(b.build("mindcare-app.psicoadmin.xyz", Some(&t("mindcare"))), central);
        assert_eq!(b.build("foo.vercel.app", Some(&t("bienestar"))), central);
    }

    #[test]
    fn per_tenant_routing_is_opt_in() {
        let b = BaseUrlBuilder::new().with_routing(ProductionRouting::PerTenantSubdomain);
        assert_eq!(
            b.build("mindcare-app.psicoadmin.xyz", Some(&t("mindcare"))),
            "https://mindcare.psicoadmin.xyz/api"
        );
        assert_eq!(
            b.build("foo.vercel.app", Some(&t("bienestar"))),
            "https://bienestar.psicoadmin.xyz/api"
        );
        assert_eq!(b.build("psicoadmin.xyz", None), "https://psico-admin.onrender.com/api");
    }

    #[test]
    fn routing_parses_from_config_strings() {
        assert_eq!("per-tenant".parse::<ProductionRouting>().unwrap(), ProductionRouting::PerTenantSubdomain);
        assert!("sideways".parse::<ProductionRouting>().is_err());
    }
}
