use chrono::{DateTime, NaiveDate, Utc, Weekday};
use classtrack_core::errors::{TrackError, TrackResult};
use classtrack_core::models::booking::Booking;
use classtrack_core::models::coach::Coach;
use classtrack_core::models::report::Report;
use classtrack_core::models::schedule::{Absence, FixedSlot, RosterEntry};
use classtrack_core::models::student::Student;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudent {
    pub coder_id: String,
    pub nickname: String,
    pub fullname: String,
    pub status: String,
    pub course: String,
    pub course_status: String,
    pub program: Option<String>,
    pub parent_password_hash: String,
    pub project_list_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCoach {
    pub id: Uuid,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReport {
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub coder_id: String,
    pub coach: String,
    pub session_date: NaiveDate,
    pub time_slot: String,
    pub note: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFixedSlot {
    pub id: Uuid,
    pub coder_id: String,
    pub coach: String,
    pub weekday: i16,
    pub time_slot: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAbsence {
    pub id: Uuid,
    pub coder_id: String,
    pub session_date: NaiveDate,
    pub time_slot: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Fixed-slot row joined with the student's nickname for the schedule board.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRosterEntry {
    pub coder_id: String,
    pub nickname: String,
    pub coach: String,
    pub weekday: i16,
    pub time_slot: String,
}

/// Weekdays are stored as 0 (Monday) through 6 (Sunday).
pub fn weekday_to_db(weekday: Weekday) -> i16 {
    weekday.num_days_from_monday() as i16
}

pub fn weekday_from_db(value: i16) -> TrackResult<Weekday> {
    match value {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        other => Err(TrackError::Validation(format!(
            "Invalid stored weekday: {}",
            other
        ))),
    }
}

impl DbStudent {
    pub fn into_domain(self) -> Student {
        Student {
            coder_id: self.coder_id,
            nickname: self.nickname,
            fullname: self.fullname,
            status: self.status,
            course: self.course,
            course_status: self.course_status,
            program: self.program,
            project_list_url: self.project_list_url,
            created_at: self.created_at,
        }
    }
}

impl DbCoach {
    pub fn into_domain(self) -> Coach {
        Coach {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

impl DbReport {
    pub fn into_domain(self) -> Report {
        Report {
            id: self.id,
            coder_id: self.coder_id,
            session_date: self.session_date,
            time_slot: self.time_slot,
            topic: self.topic,
            session_incharge: self.session_incharge,
            session_type: self.session_type,
            session_report: self.session_report,
            feedback: self.feedback,
            next_recommend: self.next_recommend,
            progress_link: self.progress_link,
            created_at: self.created_at,
        }
    }
}

impl DbBooking {
    pub fn into_domain(self) -> TrackResult<Booking> {
        Ok(Booking {
            id: self.id,
            coder_id: self.coder_id,
            coach: self.coach,
            session_date: self.session_date,
            time_slot: self.time_slot,
            note: self.note,
            status: self.status.parse()?,
            created_at: self.created_at,
        })
    }
}

impl DbFixedSlot {
    pub fn into_domain(self) -> TrackResult<FixedSlot> {
        Ok(FixedSlot {
            id: self.id,
            coder_id: self.coder_id,
            coach: self.coach,
            weekday: weekday_from_db(self.weekday)?,
            time_slot: self.time_slot,
            created_at: self.created_at,
        })
    }
}

impl DbAbsence {
    pub fn into_domain(self) -> Absence {
        Absence {
            id: self.id,
            coder_id: self.coder_id,
            session_date: self.session_date,
            time_slot: self.time_slot,
            reason: self.reason,
            created_at: self.created_at,
        }
    }
}

impl DbRosterEntry {
    pub fn into_domain(self) -> TrackResult<RosterEntry> {
        Ok(RosterEntry {
            coder_id: self.coder_id,
            nickname: self.nickname,
            coach: self.coach,
            weekday: weekday_from_db(self.weekday)?,
            time_slot: self.time_slot,
        })
    }
}
