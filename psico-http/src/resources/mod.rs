//! Typed wrappers over the backend's REST endpoints.
//!
//! Each service is a thin handle around a cloned [`ApiClient`]; the headers,
//! the 401 handling and the error mapping all come from the client.

pub mod admin;
pub mod appointments;
pub mod audit;
pub mod auth;
pub mod backups;
pub mod clinical;
pub mod payments;
pub mod professionals;
pub mod users;

mod de;

use crate::client::ApiClient;

pub use admin::AdminService;
pub use appointments::AppointmentsService;
pub use audit::AuditService;
pub use auth::AuthService;
pub use backups::BackupsService;
pub use clinical::ClinicalService;
pub use payments::PaymentsService;
pub use professionals::ProfessionalsService;
pub use users::UsersService;

impl ApiClient {
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.clone())
    }

    pub fn users(&self) -> UsersService {
        UsersService::new(self.clone())
    }

    pub fn professionals(&self) -> ProfessionalsService {
        ProfessionalsService::new(self.clone())
    }

    pub fn appointments(&self) -> AppointmentsService {
        AppointmentsService::new(self.clone())
    }

    pub fn clinical(&self) -> ClinicalService {
        ClinicalService::new(self.clone())
    }

    pub fn payments(&self) -> PaymentsService {
        PaymentsService::new(self.clone())
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.clone())
    }

    pub fn backups(&self) -> BackupsService {
        BackupsService::new(self.clone())
    }

    pub fn audit(&self) -> AuditService {
        AuditService::new(self.clone())
    }
}
