// Authentication options.

use psico_core::tenant::{normalize_host, DEFAULT_ROOT_DOMAIN};
use psico_core::PsicoConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GLOBAL_ADMIN_EMAIL: &str = "admin@psicoadmin.xyz";

/// Deployment facts the login flow needs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthOptions {
    /// Root domain serving the global administration area.
    pub root_domain: String,
    /// The one account that administers every clinic.
    pub global_admin_email: String,
    /// Scheme used when building login URLs for another host.
    pub scheme: String,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            root_domain: DEFAULT_ROOT_DOMAIN.to_string(),
            global_admin_email: DEFAULT_GLOBAL_ADMIN_EMAIL.to_string(),
            scheme: "https".to_string(),
        }
    }
}

impl AuthOptions {
    /// Reads `auth.root_domain` and `auth.global_admin_email`.
    pub fn from_config(config: &PsicoConfig) -> Self {
        let mut opts = Self::default();
        if let Some(root) = config.get_non_empty("auth.root_domain") {
            opts.root_domain = root.trim().to_ascii_lowercase();
        }
        if let Some(email) = config.get_non_empty("auth.global_admin_email") {
            opts.global_admin_email = email.trim().to_ascii_lowercase();
        }
        opts
    }

    /// Bare root domain or its `www.` alias.
    pub fn is_root_host(&self, hostname: &str) -> bool {
        let host = normalize_host(hostname);
        host == self.root_domain || host.strip_prefix("www.") == Some(self.root_domain.as_str())
    }

    pub fn is_global_admin(&self, email: &str) -> bool {
        email.trim().eq_ignore_ascii_case(&self.global_admin_email)
    }

    /// Login page of the global administration area.
    pub fn root_login_url(&self) -> String {
        format!("{}://{}/login", self.scheme, self.root_domain)
    }

    /// Login page of the clinic an email belongs to, derived from the first
    /// label of the email's domain (`ana@mindcare.com` → `mindcare-app.<root>`).
    /// `None` for addresses without a domain or inside the root domain.
    pub fn clinic_login_url(&self, email: &str) -> Option<String> {
        let (_, domain) = email.trim().split_once('@')?;
        let domain = domain.to_ascii_lowercase();
        if domain.is_empty() || domain == self.root_domain {
            return None;
        }
        let clinic = domain.split('.').next().filter(|l| !l.is_empty())?;
        Some(format!("{}://{}-app.{}/login", self.scheme, clinic, self.root_domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_urls() {
        let opts = AuthOptions::default();
        assert_eq!(opts.root_login_url(), "https://psicoadmin.xyz/login");
        assert_eq!(
            opts.clinic_login_url("ana@mindcare.com").as_deref(),
            Some("https://mindcare-app.psicoadmin.xyz/login")
        );
        assert_eq!(opts.clinic_login_url("staff@psicoadmin.xyz"), None);
        assert_eq!(opts.clinic_login_url("no-at-sign"), None);
        assert!(opts.is_global_admin("Admin@PsicoAdmin.xyz"));
        assert!(opts.is_root_host("www.psicoadmin.xyz"));
        assert!(!opts.is_root_host("localhost"));
    }

    #[test]
    fn config_overrides() {
        let mut config = PsicoConfig::new();
        config.set("auth.root_domain", "Clinics.Example");
        let opts = AuthOptions::from_config(&config);
        assert_eq!(opts.root_login_url(), "https://clinics.example/login");
        assert_eq!(opts.global_admin_email, DEFAULT_GLOBAL_ADMIN_EMAIL);
    }
}
