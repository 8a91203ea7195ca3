//! Clinic and global administration.

use chrono::{DateTime, NaiveDate, Utc};
use psico_core::errors::PsicoResult;
use psico_core::session::UserProfile;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de::opt_decimal;
use crate::client::{ApiClient, Download};
use crate::pagination::Paginated;

/// Filters for the payment report and its downloads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentReportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psychologist_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    #[serde(default, deserialize_with = "opt_decimal")]
    pub total_revenue: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub total_clinic_earning: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub total_psychologist_earning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub psychologist_name: String,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub amount: Option<String>,
    #[serde(default)]
    pub clinic_earning: f64,
    #[serde(default)]
    pub psychologist_earning: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReport {
    pub summary: PaymentSummary,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Excel,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Excel => "excel",
        }
    }
}

/// A clinic as listed for the global administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub schema_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClinicList {
    Plain(Vec<Clinic>),
    Results { results: Vec<Clinic> },
    Clinics { clinics: Vec<Clinic> },
}

#[derive(Debug, Clone)]
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Users of the clinic, optionally filtered by role tag.
    pub async fn users(&self, user_type: Option<&str>) -> PsicoResult<Vec<UserProfile>> {
        let page: Paginated<UserProfile> = match user_type {
            Some(t) => self.client.get_query("/admin/users/", &[("user_type", t)]).await?,
            None => self.client.get("/admin/users/").await?,
        };
        Ok(page.into_items())
    }

    pub async fn verification_documents(&self, user_id: u64) -> PsicoResult<Vec<Value>> {
        let page: Paginated<Value> = self
            .client
            .get(&format!("/admin/users/{user_id}/verification-documents/"))
            .await?;
        Ok(page.into_items())
    }

    pub async fn verify_profile(&self, user_id: u64) -> PsicoResult<Value> {
        self.client
            .post(&format!("/admin/users/{user_id}/verify-profile/"), &serde_json::json!({}))
            .await
    }

    pub async fn delete_user(&self, user_id: u64) -> PsicoResult<()> {
        self.client.delete(&format!("/admin/users/{user_id}/")).await
    }

    pub async fn payment_report(&self, filter: &PaymentReportFilter) -> PsicoResult<PaymentReport> {
        self.client.get_query("/admin/reports/payments/", filter).await
    }

    pub async fn download_payment_report(
        &self,
        format: ReportFormat,
        filter: &PaymentReportFilter,
    ) -> PsicoResult<Download> {
        self.client
            .get_bytes(
                &format!("/admin/reports/payments/download_{}/", format.as_str()),
                filter,
            )
            .await
    }

    /// All clinics; global administrator only. Accepts a bare list or a
    /// `results` / `clinics` envelope.
    pub async fn clinics(&self) -> PsicoResult<Vec<Clinic>> {
        let list: ClinicList = self.client.get("/tenants/").await?;
        Ok(match list {
            ClinicList::Plain(v) | ClinicList::Results { results: v } | ClinicList::Clinics { clinics: v } => v,
        })
    }
}
