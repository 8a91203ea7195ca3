use psico_core::errors::PsicoResult;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de::opt_decimal;
use crate::client::ApiClient;
use crate::pagination::Paginated;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professional {
    pub id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub consultation_fee: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<u32>,
    #[serde(default)]
    pub specializations: Vec<Value>,
    #[serde(default)]
    pub accepts_online_sessions: Option<bool>,
    #[serde(default)]
    pub accepts_in_person_sessions: Option<bool>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlan {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub number_of_sessions: u32,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub total_price: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCarePlan {
    pub title: String,
    pub description: String,
    pub number_of_sessions: u32,
    pub total_price: String,
}

#[derive(Debug, Clone)]
pub struct ProfessionalsService {
    client: ApiClient,
}

impl ProfessionalsService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> PsicoResult<Vec<Professional>> {
        let page: Paginated<Professional> = self.client.get("/professionals/").await?;
        Ok(page.into_items())
    }

    pub async fn get(&self, id: u64) -> PsicoResult<Professional> {
        self.client.get(&format!("/professionals/{id}/")).await
    }

    pub async fn reviews(&self, id: u64) -> PsicoResult<Vec<Review>> {
        let page: Paginated<Review> = self.client.get(&format!("/professionals/{id}/reviews/")).await?;
        Ok(page.into_items())
    }

    /// The logged-in professional's own profile.
    pub async fn my_profile(&self) -> PsicoResult<Professional> {
        self.client.get("/professionals/profile/").await
    }

    pub async fn update_profile<B: Serialize + ?Sized>(&self, changes: &B) -> PsicoResult<Professional> {
        self.client.put("/professionals/profile/", changes).await
    }

    /// Other professionals of the clinic (referral targets).
    pub async fn colleagues(&self) -> PsicoResult<Vec<Professional>> {
        let page: Paginated<Professional> = self.client.get("/professionals/colleagues/").await?;
        Ok(page.into_items())
    }

    pub async fn upload_verification(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        description: &str,
    ) -> PsicoResult<Value> {
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("description", description.to_string());
        self.client
            .post_multipart("/professionals/upload-verification/", form)
            .await
    }

    pub async fn care_plans(&self) -> PsicoResult<Vec<CarePlan>> {
        let page: Paginated<CarePlan> = self.client.get("/professionals/care-plans/").await?;
        Ok(page.into_items())
    }

    pub async fn create_care_plan(&self, plan: &NewCarePlan) -> PsicoResult<CarePlan> {
        self.client.post("/professionals/care-plans/", plan).await
    }

    pub async fn set_care_plan_active(&self, plan_id: u64, active: bool) -> PsicoResult<CarePlan> {
        self.client
            .patch(
                &format!("/professionals/care-plans/{plan_id}/"),
                &serde_json::json!({ "is_active": active }),
            )
            .await
    }
}
