use chrono::{DateTime, Utc};
use psico_core::errors::PsicoResult;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, Download};
use crate::pagination::Paginated;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: u64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuditService {
    client: ApiClient,
}

impl AuditService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn logs(&self, filter: &AuditFilter) -> PsicoResult<Vec<AuditEntry>> {
        let page: Paginated<AuditEntry> = self.client.get_query("/auditlog/logs/", filter).await?;
        Ok(page.into_items())
    }

    pub async fn export_pdf(&self, filter: &AuditFilter) -> PsicoResult<Download> {
        self.client.get_bytes("/auditlog/logs/export-pdf/", filter).await
    }
}
