//! Typed view over the session store.
//!
//! Every reader and writer of session state goes through [`Session`], so the
//! key names below are the only place the storage schema is spelled out.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::role::Role;
use crate::store::{MemorySessionStore, SessionStore};

/// Storage keys. `AUTH_TOKEN` and `ACCESS_TOKEN` hold the same credential
/// under its current and legacy names.
pub mod keys {
    pub const AUTH_TOKEN: &str = "authToken";
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER_TYPE: &str = "userType";
    pub const USER: &str = "user";
    pub const CURRENT_USER: &str = "currentUser";
    pub const SELECTED_TENANT: &str = "selectedTenant";
    pub const TRIAGE_COMPLETED: &str = "triageCompleted";
}

/// User object returned by the login endpoint. Unknown fields are kept so
/// the stored copy round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub user_type: String,
    #[serde(default)]
    pub has_completed_triage: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Slim copy kept under `currentUser`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: u64,
    pub first_name: String,
}

/// Everything a successful login persists.
#[derive(Debug, Clone)]
pub struct LoginRecord {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: UserProfile,
}

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.has_credential())
            .field("role", &self.role())
            .finish()
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Current credential, preferring the primary key over the legacy one.
    pub fn token(&self) -> Option<String> {
        non_empty(self.store.get(keys::AUTH_TOKEN))
            .or_else(|| non_empty(self.store.get(keys::ACCESS_TOKEN)))
    }

    pub fn has_credential(&self) -> bool {
        self.token().is_some()
    }

    pub fn refresh_token(&self) -> Option<String> {
        non_empty(self.store.get(keys::REFRESH_TOKEN))
    }

    /// Raw stored role tag, if any.
    pub fn role_tag(&self) -> Option<String> {
        non_empty(self.store.get(keys::USER_TYPE))
    }

    /// Stored role; unknown tags read as no role.
    pub fn role(&self) -> Option<Role> {
        self.role_tag().and_then(|r| r.parse().ok())
    }

    pub fn user(&self) -> Option<UserProfile> {
        let raw = non_empty(self.store.get(keys::USER))?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "stored user profile is unreadable");
                None
            }
        }
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        let raw = non_empty(self.store.get(keys::CURRENT_USER))?;
        serde_json::from_str(&raw).ok()
    }

    pub fn selected_tenant(&self) -> Option<String> {
        non_empty(self.store.get(keys::SELECTED_TENANT)).map(|s| s.trim().to_string())
    }

    pub fn set_selected_tenant(&self, tenant: Option<&str>) -> Result<()> {
        match tenant.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => self.store.set(keys::SELECTED_TENANT, t)?,
            None => self.store.remove(keys::SELECTED_TENANT)?,
        }
        Ok(())
    }

    /// Local override written right after the questionnaire is submitted.
    pub fn triage_flag(&self) -> bool {
        non_empty(self.store.get(keys::TRIAGE_COMPLETED)).is_some()
    }

    /// Server-provided flag OR local override.
    pub fn triage_completed(&self) -> bool {
        self.user().is_some_and(|u| u.has_completed_triage) || self.triage_flag()
    }

    pub fn store_login(&self, record: &LoginRecord) -> Result<()> {
        let user_json = serde_json::to_string(&record.user)?;
        let current = serde_json::to_string(&CurrentUser {
            id: record.user.id,
            first_name: record.user.first_name.clone(),
        })?;

        self.store.set(keys::ACCESS_TOKEN, &record.token)?;
        self.store.set(keys::AUTH_TOKEN, &record.token)?;
        self.store.set(
            keys::REFRESH_TOKEN,
            record.refresh_token.as_deref().unwrap_or(""),
        )?;
        self.store.set(keys::USER_TYPE, &record.user.user_type)?;
        self.store.set(keys::USER, &user_json)?;
        self.store.set(keys::CURRENT_USER, &current)?;
        Ok(())
    }

    /// Set the local flag and patch the stored user object.
    pub fn mark_triage_completed(&self) -> Result<()> {
        self.store.set(keys::TRIAGE_COMPLETED, "true")?;
        if let Some(mut user) = self.user() {
            user.has_completed_triage = true;
            self.store.set(keys::USER, &serde_json::to_string(&user)?)?;
        }
        Ok(())
    }

    /// Drop credential (both names) and role. Used when the backend rejects
    /// the credential.
    pub fn clear_credentials(&self) -> Result<()> {
        self.remove_keys(&[keys::AUTH_TOKEN, keys::ACCESS_TOKEN, keys::USER_TYPE])
    }

    /// Every key is attempted even after a failure; a key the store cannot
    /// remove is blanked instead, which readers treat as absent. The first
    /// error is returned.
    pub fn remove_keys(&self, names: &[&str]) -> Result<()> {
        let mut first_err = None;
        for k in names {
            if let Err(e) = self.store.remove(k) {
                tracing::warn!(key = %k, error = %e, "could not remove session key, blanking it");
                if let Err(blank) = self.store.set(k, "") {
                    tracing::warn!(key = %k, error = %blank, "could not blank session key");
                }
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn clear_all(&self) -> Result<()> {
        self.store.clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use serde_json::json;

    fn patient(triaged: bool) -> UserProfile {
        serde_json::from_value(json!({
            "id": 7,
            "email": "ana@bienestar.com",
            "first_name": "Ana",
            "user_type": "patient",
            "has_completed_triage": triaged,
            "phone": "555"
        }))
        .unwrap()
    }

    #[test]
    fn login_writes_every_key() {
        let session = Session::default();
        session
            .store_login(&LoginRecord {
                token: "tok".into(),
                refresh_token: None,
                user: patient(false),
            })
            .unwrap();

        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.store().get(keys::ACCESS_TOKEN).as_deref(), Some("tok"));
        assert_eq!(session.store().get(keys::REFRESH_TOKEN).as_deref(), Some(""));
        assert_eq!(session.refresh_token(), None);
        assert_eq!(session.role(), Some(Role::Patient));
        assert_eq!(session.current_user().unwrap().first_name, "Ana");
        assert_eq!(session.user().unwrap().extra["phone"], "555");
    }

    /// Store whose `remove` of one key always fails.
    struct StuckKey {
        inner: MemorySessionStore,
        stuck: &'static str,
    }

    impl SessionStore for StuckKey {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> std::result::Result<(), StoreError> {
            if key == self.stuck {
                return Err(StoreError::Io {
                    path: "session.json".into(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            self.inner.remove(key)
        }
        fn clear(&self) -> std::result::Result<(), StoreError> {
            self.inner.clear()
        }
        fn keys(&self) -> Vec<String> {
            self.inner.keys()
        }
    }

    #[test]
    fn failed_removal_still_drops_the_credential() {
        let store = StuckKey {
            inner: MemorySessionStore::with_entries([
                (keys::AUTH_TOKEN, "tok"),
                (keys::ACCESS_TOKEN, "tok"),
                (keys::USER_TYPE, "patient"),
            ]),
            stuck: keys::AUTH_TOKEN,
        };
        let session = Session::new(Arc::new(store));

        assert!(session.clear_credentials().is_err());
        assert!(!session.has_credential());
        assert_eq!(session.role(), None);
        assert!(session.store().get(keys::ACCESS_TOKEN).is_none());
    }

    #[test]
    fn legacy_token_name_is_read() {
        let session = Session::new(Arc::new(MemorySessionStore::with_entries([(
            keys::ACCESS_TOKEN,
            "legacy",
        )])));
        assert_eq!(session.token().as_deref(), Some("legacy"));
        session.clear_credentials().unwrap();
        assert!(!session.has_credential());
    }

    #[test]
    fn triage_completion_updates_user_copy() {
        let session = Session::default();
        session
            .store_login(&LoginRecord {
                token: "tok".into(),
                refresh_token: Some("r".into()),
                user: patient(false),
            })
            .unwrap();
        assert!(!session.triage_completed());

        session.mark_triage_completed().unwrap();
        assert!(session.triage_flag());
        assert!(session.user().unwrap().has_completed_triage);
    }

    #[test]
    fn unreadable_user_json_is_ignored() {
        let session = Session::new(Arc::new(MemorySessionStore::with_entries([(
            keys::USER,
            "{not json",
        )])));
        assert!(session.user().is_none());
        assert!(!session.triage_completed());
    }
}
