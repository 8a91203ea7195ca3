//! psico-auth: who may see which screen, and how sessions start and end.

pub mod guard;
pub mod login;
pub mod options;
pub mod routes;

pub use guard::{GuardDecision, Navigation, Navigator, RouteGuard};
pub use login::{landing_route, LoginError, LoginFlow, LoginOutcome, LogoutScope};
pub use options::AuthOptions;
pub use routes::{Area, RouteEntry, RouteMatch, RouteTable};
