use psico_core::errors::PsicoResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de::opt_decimal;
use crate::client::ApiClient;
use crate::pagination::Paginated;
use crate::resources::professionals::CarePlan;

/// A care plan bought by the patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientPlan {
    pub id: u64,
    #[serde(default)]
    pub sessions_remaining: u32,
    pub plan: PlanRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRef {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub psychologist_id: Option<u64>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub total_price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Checkout {
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct PaymentsService {
    client: ApiClient,
}

impl PaymentsService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Plans a professional offers.
    pub async fn plans_for(&self, psychologist_user_id: u64) -> PsicoResult<Vec<CarePlan>> {
        let page: Paginated<CarePlan> = self
            .client
            .get_query(
                "/payments/plans/list/",
                &[("psychologist_id", psychologist_user_id.to_string())],
            )
            .await?;
        Ok(page.into_items())
    }

    pub async fn my_plans(&self) -> PsicoResult<Vec<PatientPlan>> {
        let page: Paginated<PatientPlan> = self.client.get("/payments/plans/my-plans/").await?;
        Ok(page.into_items())
    }

    /// Plans with sessions left for one professional.
    pub async fn usable_plans_for(&self, psychologist_user_id: u64) -> PsicoResult<Vec<PatientPlan>> {
        Ok(self
            .my_plans()
            .await?
            .into_iter()
            .filter(|p| p.sessions_remaining > 0 && p.plan.psychologist_id == Some(psychologist_user_id))
            .collect())
    }

    /// Start a checkout; the host opens `checkout_url`.
    pub async fn purchase(&self, plan_id: u64) -> PsicoResult<Checkout> {
        self.client
            .post("/payments/plans/purchase/", &serde_json::json!({ "plan_id": plan_id }))
            .await
    }

    /// Confirm a completed checkout session. Returns the confirmed
    /// appointment when the backend includes one, else the whole body.
    pub async fn confirm(&self, session_id: &str) -> PsicoResult<Value> {
        let mut body: Value = self
            .client
            .post("/payments/confirm-payment/", &serde_json::json!({ "session_id": session_id }))
            .await?;
        Ok(match body.get_mut("appointment").map(Value::take) {
            Some(appt) if !appt.is_null() => appt,
            _ => body,
        })
    }
}
