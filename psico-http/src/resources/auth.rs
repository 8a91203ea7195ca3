use psico_core::errors::PsicoResult;
use psico_core::session::{LoginRecord, UserProfile};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{read_json, ApiClient};

pub const LOGIN_PATH: &str = "/auth/login/";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UserProfile,
}

impl LoginResponse {
    pub fn into_record(self) -> LoginRecord {
        LoginRecord {
            token: self.token,
            refresh_token: self.refresh_token,
            user: self.user,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Clinic login: goes through the tenant-scoped client.
    pub async fn login(&self, email: &str, password: &str) -> PsicoResult<LoginResponse> {
        self.client
            .post(LOGIN_PATH, &Credentials { email, password })
            .await
    }

    /// Global administrator login: no tenant header, no stale credential,
    /// and a rejection does not end any stored session.
    pub async fn login_global(&self, email: &str, password: &str) -> PsicoResult<LoginResponse> {
        let req = self
            .client
            .public_request(Method::POST, LOGIN_PATH)
            .json(&Credentials { email, password });
        let resp = self.client.send_public(req).await?;
        read_json(resp).await
    }
}
