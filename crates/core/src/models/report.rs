use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A coach-written session report. Reports are addressed by UUID; the
/// legacy sheet addressed them by row position, which silently corrupted
/// edits when rows shifted under a concurrent writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub coder_id: String,
    pub session_date: NaiveDate,
    pub time_slot: Option<String>,
    pub topic: String,
    pub session_incharge: String,
    pub session_type: String,
    pub session_report: String,
    pub feedback: Option<String>,
    pub next_recommend: Option<String>,
    pub progress_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportRequest {
    pub coder_id: String,
    pub session_date: NaiveDate,
    pub time_slot: Option<String>,
    pub topic: String,
    pub session_incharge: String,
    #[serde(default)]
    pub session_type: String,
    pub session_report: String,
    pub feedback: Option<String>,
    pub next_recommend: Option<String>,
    pub progress_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReportRequest {
    pub session_date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub topic: Option<String>,
    pub session_incharge: Option<String>,
    pub session_type: Option<String>,
    pub session_report: Option<String>,
    pub feedback: Option<String>,
    pub next_recommend: Option<String>,
    pub progress_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReportResponse {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReportsResponse {
    pub reports: Vec<Report>,
}
