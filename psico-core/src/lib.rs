//! psico-core: framework-agnostic core for the Psico clinic client.
//!
//! Tenant resolution, session storage, session events, configuration and
//! errors. Nothing here performs I/O beyond the optional file-backed store.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod events;
pub mod role;
pub mod session;
pub mod store;
pub mod tenant;

pub use catalog::{TenantCatalog, TenantProfile};
pub use config::PsicoConfig;
pub use errors::{ErrorKind, PsicoError, PsicoResult};
pub use events::{SessionEvent, SessionEventKind, SessionEvents};
pub use role::Role;
pub use session::{LoginRecord, Session, UserProfile};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
pub use tenant::{TenantContext, TenantId, TenantResolver};
