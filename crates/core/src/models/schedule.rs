use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student's recurring weekly (weekday, time, coach) assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedSlot {
    pub id: Uuid,
    pub coder_id: String,
    pub coach: String,
    pub weekday: Weekday,
    pub time_slot: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFixedSlotRequest {
    pub coder_id: String,
    pub coach: String,
    pub weekday: Weekday,
    pub time_slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFixedSlotResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A filed non-attendance for one specific date of an otherwise
/// recurring fixed-schedule slot. The fixed assignment itself is kept;
/// the seat is freed for that date only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Absence {
    pub id: Uuid,
    pub coder_id: String,
    pub session_date: NaiveDate,
    pub time_slot: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAbsenceRequest {
    pub coder_id: String,
    /// Explicit date of the missed class. When omitted, `weekday` must be
    /// set and the date resolves to its next calendar occurrence.
    pub session_date: Option<NaiveDate>,
    pub weekday: Option<Weekday>,
    pub time_slot: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAbsenceResponse {
    pub id: Uuid,
    /// The date the absence was filed against.
    pub session_date: NaiveDate,
}

/// One fixed-schedule membership row joined with the student's nickname,
/// as shown on the coach schedule board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub coder_id: String,
    pub nickname: String,
    pub coach: String,
    pub weekday: Weekday,
    pub time_slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterStudent {
    pub coder_id: String,
    pub nickname: String,
}

/// A (weekday, time) cell of the coach schedule board with its occupants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSlot {
    pub weekday: Weekday,
    pub time_slot: String,
    pub seats_taken: u32,
    pub max_seats: u32,
    pub students: Vec<RosterStudent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCoachScheduleResponse {
    pub coach: String,
    pub slots: Vec<RosterSlot>,
}
