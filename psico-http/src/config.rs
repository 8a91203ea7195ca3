//! Client configuration.

use std::time::Duration;

use anyhow::Result;
use psico_core::PsicoConfig;

use crate::base_url::{BaseUrlBuilder, ProductionRouting};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Everything needed to build an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host the client acts on behalf of (the page's hostname in a browser).
    pub hostname: String,
    pub base_url: BaseUrlBuilder,
    pub timeout: Duration,
    /// Written to the session as `selectedTenant` when the client is built.
    pub selected_tenant: Option<String>,
}

impl ClientConfig {
    pub fn for_host(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            base_url: BaseUrlBuilder::default(),
            timeout: DEFAULT_TIMEOUT,
            selected_tenant: None,
        }
    }

    /// Read `api.*` / `tenant.*` / `app.hostname` keys. `hostname` wins over
    /// `app.hostname`, which defaults to `localhost`.
    ///
    /// | key                      | meaning                               |
    /// |--------------------------|---------------------------------------|
    /// | `api.url`                | explicit base URL override            |
    /// | `api.timeout_secs`       | request timeout (default 90)          |
    /// | `api.local_port`         | backend port in local development     |
    /// | `api.central_origin`     | deployed backend origin               |
    /// | `api.production_routing` | `centralized` or `per-tenant`         |
    /// | `tenant.selected`        | explicit tenant preference            |
    pub fn from_config(config: &PsicoConfig, hostname: Option<&str>) -> Result<Self> {
        let hostname = hostname
            .map(str::to_string)
            .or_else(|| config.get_non_empty("app.hostname").map(str::to_string))
            .unwrap_or_else(|| "localhost".to_string());

        let mut base_url = BaseUrlBuilder::default().with_override(config.get_non_empty("api.url"));
        if let Some(port) = config.get_u16("api.local_port") {
            base_url = base_url.with_local_port(port);
        }
        if let Some(origin) = config.get_non_empty("api.central_origin") {
            base_url = base_url.with_central_origin(origin);
        }
        if let Some(routing) = config.get_non_empty("api.production_routing") {
            base_url = base_url.with_routing(routing.parse::<ProductionRouting>()?);
        }

        let timeout = config
            .get_u64("api.timeout_secs")
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            hostname,
            base_url,
            timeout,
            selected_tenant: config.get_non_empty("tenant.selected").map(str::to_string),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: BaseUrlBuilder) -> Self {
        self.base_url = base_url;
        self
    }

    /// Shorthand for an override URL (tests, staging).
    pub fn with_override(mut self, url: impl Into<String>) -> Self {
        self.base_url = self.base_url.with_override(Some(url.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_keys_feed_the_builder() {
        let mut config = PsicoConfig::new();
        config.set("api.timeout_secs", "5");
        config.set("api.local_port", "9001");
        config.set("tenant.selected", "mindcare");

        let cfg = ClientConfig::from_config(&config, Some("bienestar.localhost")).unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.selected_tenant.as_deref(), Some("mindcare"));
        assert_eq!(cfg.base_url.build(&cfg.hostname, None), "http://localhost:9001/api");
    }

    #[test]
    fn bad_routing_value_is_an_error() {
        let mut config = PsicoConfig::new();
        config.set("api.production_routing", "diagonal");
        assert!(ClientConfig::from_config(&config, None).is_err());
    }

    #[test]
    fn defaults_without_config() {
        let cfg = ClientConfig::from_config(&PsicoConfig::new(), None).unwrap();
        assert_eq!(cfg.hostname, "localhost");
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert!(cfg.base_url.override_url().is_none());
    }
}
