use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role tag stored alongside the credential. Only used for route gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Professional,
    Admin,
    Superuser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Professional => "professional",
            Role::Admin => "admin",
            Role::Superuser => "superuser",
        }
    }

    /// Does a session holding `self` satisfy a view requiring `required`?
    /// Superusers pass admin views; everything else must match exactly.
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::Admin => matches!(self, Role::Admin | Role::Superuser),
            other => *self == other,
        }
    }

    pub fn is_admin_like(&self) -> bool {
        matches!(self, Role::Admin | Role::Superuser)
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "patient" => Ok(Role::Patient),
            "professional" => Ok(Role::Professional),
            "admin" => Ok(Role::Admin),
            "superuser" => Ok(Role::Superuser),
            other => Err(anyhow::anyhow!("unknown role '{other}'")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superuser_passes_admin_views_only() {
        assert!(Role::Superuser.satisfies(Role::Admin));
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(!Role::Superuser.satisfies(Role::Patient));
        assert!(!Role::Admin.satisfies(Role::Superuser));
    }

    #[test]
    fn parse_is_closed() {
        assert_eq!("professional".parse::<Role>().ok(), Some(Role::Professional));
        assert!("Patient".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }
}
