use chrono::{DateTime, Utc};
use psico_core::errors::PsicoResult;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiClient, Download, NO_QUERY};
use crate::pagination::Paginated;

pub const DEFAULT_BACKUP_FILENAME: &str = "backup.sql";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub id: u64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub backup_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct BackupsService {
    client: ApiClient,
}

impl BackupsService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn history(&self) -> PsicoResult<Vec<BackupRecord>> {
        let page: Paginated<BackupRecord> = self.client.get("/backups/history/").await?;
        Ok(page.into_items())
    }

    /// Create a backup stored in the cloud only.
    pub async fn create_in_cloud(&self) -> PsicoResult<Value> {
        self.client
            .post("/backups/create/?cloud_only=true", &serde_json::json!({}))
            .await
    }

    /// Create a backup and receive the dump. The filename falls back to
    /// `backup.sql` when the server does not name it.
    pub async fn create_and_download(&self) -> PsicoResult<Download> {
        let mut dl = self
            .client
            .post_bytes("/backups/create/?download=true", &serde_json::json!({}))
            .await?;
        dl.filename.get_or_insert_with(|| DEFAULT_BACKUP_FILENAME.to_string());
        Ok(dl)
    }

    pub async fn download(&self, backup_id: u64) -> PsicoResult<Download> {
        self.client
            .get_bytes(&format!("/backups/history/{backup_id}/download/"), NO_QUERY)
            .await
    }

    /// Restore the clinic from a dump file.
    pub async fn restore(&self, file_name: &str, bytes: Vec<u8>) -> PsicoResult<Value> {
        let form = Form::new().part("backup_file", Part::bytes(bytes).file_name(file_name.to_string()));
        self.client.post_multipart("/backups/restore/", form).await
    }
}
