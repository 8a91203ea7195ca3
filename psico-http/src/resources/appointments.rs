use chrono::{DateTime, NaiveDate, Utc};
use psico_core::errors::PsicoResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::pagination::Paginated;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub schedule: Vec<ScheduleDay>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schedule {
    /// First day with at least one bookable slot.
    pub fn first_available(&self) -> Option<&ScheduleDay> {
        self.schedule.iter().find(|d| d.is_available)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&ScheduleDay> {
        self.schedule.iter().find(|d| d.date == date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    #[serde(default)]
    pub appointment_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub psychologist_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub psychologist: u64,
    pub appointment_date: NaiveDate,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_plan_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionNote {
    pub id: u64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct AppointmentsService {
    client: ApiClient,
}

impl AppointmentsService {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn schedule(&self, psychologist_user_id: u64) -> PsicoResult<Schedule> {
        self.client
            .get(&format!("/appointments/psychologist/{psychologist_user_id}/schedule/"))
            .await
    }

    pub async fn list(&self) -> PsicoResult<Vec<Appointment>> {
        let page: Paginated<Appointment> = self.client.get("/appointments/appointments/").await?;
        Ok(page.into_items())
    }

    pub async fn get(&self, id: u64) -> PsicoResult<Appointment> {
        self.client.get(&format!("/appointments/appointments/{id}/")).await
    }

    pub async fn book(&self, appointment: &NewAppointment) -> PsicoResult<Appointment> {
        self.client.post("/appointments/appointments/", appointment).await
    }

    pub async fn refer(&self, appointment_id: u64, colleague_id: u64, reason: &str) -> PsicoResult<Value> {
        self.client
            .post(
                &format!("/appointments/appointments/{appointment_id}/refer/"),
                &serde_json::json!({ "referred_psychologist_id": colleague_id, "reason": reason }),
            )
            .await
    }

    /// Private note of a session; `None` until one is written.
    pub async fn note(&self, appointment_id: u64) -> PsicoResult<Option<SessionNote>> {
        self.client
            .get_optional(&format!("/appointments/appointments/{appointment_id}/note/"))
            .await
    }

    /// Create the note, or update `existing` in place.
    pub async fn save_note(
        &self,
        appointment_id: u64,
        existing: Option<u64>,
        content: &str,
    ) -> PsicoResult<SessionNote> {
        let body = serde_json::json!({ "content": content });
        match existing {
            Some(note_id) => {
                self.client
                    .patch(
                        &format!("/appointments/appointments/{appointment_id}/note/{note_id}/"),
                        &body,
                    )
                    .await
            }
            None => {
                self.client
                    .post(&format!("/appointments/appointments/{appointment_id}/note/"), &body)
                    .await
            }
        }
    }
}
