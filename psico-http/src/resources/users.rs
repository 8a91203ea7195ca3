use psico_core::errors::PsicoResult;
use psico_core::session::UserProfile;

use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct UsersService {
    client: ApiClient,
}

impl UsersService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Profile of the logged-in user.
    pub async fn profile(&self) -> PsicoResult<UserProfile> {
        self.client.get("/users/profile/").await
    }
}
