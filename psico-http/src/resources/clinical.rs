//! Clinical history: objectives and their tasks, prescriptions, the mood
//! journal and patient documents.

use chrono::{DateTime, NaiveDate, Utc};
use psico_core::errors::PsicoResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{ApiClient, Download, NO_QUERY};
use crate::pagination::Paginated;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub is_completed_today: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewObjective {
    pub patient: u64,
    pub appointment: u64,
    pub title: String,
    pub description: String,
    pub tasks: Vec<String>,
    pub recurrence: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StatsEnvelope {
    stats: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: u64,
    pub medication_name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPrescription {
    pub patient: u64,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub notes: String,
}

/// Mood values the journal accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Feliz,
    Tranquilo,
    Neutral,
    Triste,
    Ansioso,
    Irritable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: u64,
    pub mood: Mood,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalDocument {
    pub id: u64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub uploaded_by_name: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ClinicalService {
    client: ApiClient,
}

impl ClinicalService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // ---- objectives ----

    pub async fn my_objectives(&self) -> PsicoResult<Vec<Objective>> {
        let page: Paginated<Objective> = self.client.get("/clinical-history/objectives/my/").await?;
        Ok(page.into_items())
    }

    /// Weekly completion figures; the backend nests them under `stats`.
    pub async fn my_objective_stats(&self) -> PsicoResult<Map<String, Value>> {
        let env: StatsEnvelope = self.client.get("/clinical-history/objectives/my/stats/").await?;
        Ok(env.stats)
    }

    pub async fn assign_objective(&self, objective: &NewObjective) -> PsicoResult<Objective> {
        self.client.post("/clinical-history/objectives/", objective).await
    }

    pub async fn complete_task(&self, task_id: u64, notes: &str) -> PsicoResult<Value> {
        self.client
            .post(
                &format!("/clinical-history/tasks/{task_id}/complete/"),
                &serde_json::json!({ "notes": notes }),
            )
            .await
    }

    // ---- prescriptions ----

    pub async fn patient_prescriptions(&self, patient_id: u64) -> PsicoResult<Vec<Prescription>> {
        let page: Paginated<Prescription> = self
            .client
            .get(&format!("/clinical-history/patient/{patient_id}/prescriptions/"))
            .await?;
        Ok(page.into_items())
    }

    pub async fn prescribe(&self, prescription: &NewPrescription) -> PsicoResult<Prescription> {
        self.client
            .post(
                &format!("/clinical-history/patient/{}/prescriptions/", prescription.patient),
                prescription,
            )
            .await
    }

    pub async fn deactivate_prescription(&self, patient_id: u64, prescription_id: u64) -> PsicoResult<Prescription> {
        self.client
            .patch(
                &format!("/clinical-history/patient/{patient_id}/prescriptions/{prescription_id}/"),
                &serde_json::json!({ "is_active": false }),
            )
            .await
    }

    pub async fn my_prescriptions(&self) -> PsicoResult<Vec<Prescription>> {
        let page: Paginated<Prescription> = self
            .client
            .get("/clinical-history/prescriptions/my-prescriptions/")
            .await?;
        Ok(page.into_items())
    }

    // ---- mood journal ----

    pub async fn mood_journal(&self) -> PsicoResult<Vec<MoodEntry>> {
        let page: Paginated<MoodEntry> = self.client.get("/clinical-history/mood-journal/").await?;
        Ok(page.into_items())
    }

    pub async fn log_mood(&self, mood: Mood, notes: &str) -> PsicoResult<MoodEntry> {
        self.client
            .post(
                "/clinical-history/mood-journal/",
                &serde_json::json!({ "mood": mood, "notes": notes }),
            )
            .await
    }

    /// Today's entry; `None` (a 404 upstream) means the patient has not
    /// journaled yet today.
    pub async fn mood_today(&self) -> PsicoResult<Option<MoodEntry>> {
        self.client.get_optional("/clinical-history/mood-journal/today/").await
    }

    // ---- documents ----

    pub async fn my_documents(&self) -> PsicoResult<Vec<ClinicalDocument>> {
        let page: Paginated<ClinicalDocument> = self.client.get("/clinical-history/my-documents/").await?;
        Ok(page.into_items())
    }

    pub async fn download_document(&self, document_id: u64) -> PsicoResult<Download> {
        self.client
            .get_bytes(&format!("/clinical-history/documents/{document_id}/download/"), NO_QUERY)
            .await
    }
}
