//! Display profiles for the known tenants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tenant::TenantId;

pub const GLOBAL_ADMIN_SLUG: &str = "global-admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
}

/// Branding and flags for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProfile {
    pub slug: TenantId,
    pub name: String,
    pub theme: String,
    pub logo: String,
    pub colors: BrandColors,
    #[serde(default)]
    pub is_global_admin: bool,
}

impl TenantProfile {
    fn new(slug: &str, name: &str, primary: &str, secondary: &str) -> Self {
        Self {
            slug: TenantId::from(slug),
            name: name.to_string(),
            theme: slug.to_string(),
            logo: format!("/logos/{slug}.png"),
            colors: BrandColors {
                primary: primary.to_string(),
                secondary: secondary.to_string(),
            },
            is_global_admin: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TenantCatalog {
    profiles: BTreeMap<TenantId, TenantProfile>,
    fallback: TenantId,
}

impl Default for TenantCatalog {
    fn default() -> Self {
        let mut global = TenantProfile::new(
            GLOBAL_ADMIN_SLUG,
            "Administrador General - Psico SAS",
            "#1F2937",
            "#3B82F6",
        );
        global.is_global_admin = true;

        Self::new(
            [
                TenantProfile::new("bienestar", "Clínica Bienestar", "#0066CC", "#00AA44"),
                TenantProfile::new("mindcare", "MindCare Psicología", "#6B46C1", "#EC4899"),
                global,
            ],
            TenantId::from("bienestar"),
        )
    }
}

impl TenantCatalog {
    pub fn new<I>(profiles: I, fallback: TenantId) -> Self
    where
        I: IntoIterator<Item = TenantProfile>,
    {
        Self {
            profiles: profiles.into_iter().map(|p| (p.slug.clone(), p)).collect(),
            fallback,
        }
    }

    pub fn profile(&self, slug: &str) -> Option<&TenantProfile> {
        self.profiles.get(&TenantId::from(slug))
    }

    /// Profile for a resolved tenant. Root context has none; an unknown
    /// slug gets the fallback clinic's branding.
    pub fn current_profile(&self, resolved: Option<&TenantId>) -> Option<&TenantProfile> {
        let tenant = resolved?;
        self.profiles
            .get(tenant)
            .or_else(|| self.profiles.get(&self.fallback))
    }

    pub fn is_global_admin_context(&self, resolved: Option<&TenantId>) -> bool {
        match resolved {
            None => true,
            Some(t) => t.as_str() == GLOBAL_ADMIN_SLUG,
        }
    }

    pub fn is_multi_tenant_context(&self, resolved: Option<&TenantId>) -> bool {
        !self.is_global_admin_context(resolved)
    }

    /// Tenants that hostnames may resolve to.
    pub fn clinic_slugs(&self) -> Vec<TenantId> {
        self.profiles
            .values()
            .filter(|p| !p.is_global_admin)
            .map(|p| p.slug.clone())
            .collect()
    }
}
