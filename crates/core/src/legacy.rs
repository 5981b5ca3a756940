//! # Legacy Spreadsheet Import
//!
//! The school's historical data lives in spreadsheets whose column
//! headers drifted over the years ("Session report" vs "session_report",
//! "No" vs "Coder ID", a misspelled "Recommandation", ...). This module
//! absorbs that drift: each canonical field carries an ordered alias
//! list, and CSV exports are normalized into typed records with
//! best-effort trimming. Rows without a coder id are skipped.

use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::errors::{TrackError, TrackResult};

const STUDENT_ALIASES: &[(&str, &[&str])] = &[
    ("coder_id", &["coder_id", "coder id", "Coder ID", "No", "ID"]),
    ("nickname", &["nickname", "Nickname", "Nick name", "Name"]),
    ("fullname", &["fullname", "Fullname", "Full name"]),
    ("status", &["status", "Status", "Enrollment Status"]),
    ("course", &["course", "Course"]),
    ("course_status", &["course_status", "Status of course"]),
    ("program", &["program", "Program"]),
    (
        "parent_password",
        &["parent_password", "Parent Password", "Parent pass", "Password"],
    ),
    (
        "project_list_url",
        &["project_list_url", "Project List", "ProjectListURL", "Project Link"],
    ),
];

const REPORT_ALIASES: &[(&str, &[&str])] = &[
    ("coder_id", &["coder_id", "coder id", "Coder ID", "No", "id"]),
    ("date", &["date", "Date"]),
    ("time", &["time", "Time"]),
    ("topic", &["topic", "Topic", "course", "Course"]),
    (
        "session_incharge",
        &[
            "session_incharge",
            "session incharge",
            "Session incharge",
            "session in-charge",
            "incharge",
            "coach_name",
            "coach name",
            "coach",
            "Coach",
        ],
    ),
    (
        "session_type",
        &["session_type", "session type", "Session type", "class type"],
    ),
    (
        "session_report",
        &[
            "session_report",
            "session report",
            "Session report",
            "progress_summary",
            "summary",
        ],
    ),
    ("feedback", &["feedback", "Feedback", "comment"]),
    (
        "next_recommend",
        &[
            "next_recommend",
            "Recommendation for next session",
            "Recommandation for next session",
            "next recommendation",
            "next_plan",
            "Next Plan",
        ],
    ),
    (
        "progress_link",
        &[
            "progress_link",
            "12 Times Progress Report (link)",
            "Project or 12 Times Progress Report (link)",
            "link",
            "attachments",
            "attachment",
        ],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyStudent {
    pub coder_id: String,
    pub nickname: String,
    pub fullname: String,
    pub status: String,
    pub course: String,
    pub course_status: String,
    pub program: String,
    pub parent_password: String,
    pub project_list_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyReport {
    pub coder_id: String,
    pub date: String,
    pub time: String,
    pub topic: String,
    pub session_incharge: String,
    pub session_type: String,
    pub session_report: String,
    pub feedback: String,
    pub next_recommend: String,
    pub progress_link: String,
}

/// Maps each canonical field to the first header column matching one of
/// its aliases. Headers are compared after BOM stripping and trimming.
fn header_positions(headers: &StringRecord, aliases: &[(&str, &[&str])]) -> Vec<Option<usize>> {
    let cleaned: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    aliases
        .iter()
        .map(|(_, names)| {
            names
                .iter()
                .find_map(|name| cleaned.iter().position(|h| h == name))
        })
        .collect()
}

fn field(record: &StringRecord, position: Option<usize>) -> String {
    position
        .and_then(|idx| record.get(idx))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn read_rows<R: Read>(reader: R) -> TrackResult<(StringRecord, Vec<StringRecord>)> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| TrackError::Internal(Box::new(e)))?
        .clone();
    let rows = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TrackError::Internal(Box::new(e)))?;
    Ok((headers, rows))
}

pub fn students_from_csv<R: Read>(reader: R) -> TrackResult<Vec<LegacyStudent>> {
    let (headers, rows) = read_rows(reader)?;
    let pos = header_positions(&headers, STUDENT_ALIASES);

    Ok(rows
        .iter()
        .map(|row| LegacyStudent {
            coder_id: field(row, pos[0]),
            nickname: field(row, pos[1]),
            fullname: field(row, pos[2]),
            status: field(row, pos[3]),
            course: field(row, pos[4]),
            course_status: field(row, pos[5]),
            program: field(row, pos[6]),
            parent_password: field(row, pos[7]),
            project_list_url: field(row, pos[8]),
        })
        .filter(|s| !s.coder_id.is_empty())
        .collect())
}

pub fn reports_from_csv<R: Read>(reader: R) -> TrackResult<Vec<LegacyReport>> {
    let (headers, rows) = read_rows(reader)?;
    let pos = header_positions(&headers, REPORT_ALIASES);

    Ok(rows
        .iter()
        .map(|row| LegacyReport {
            coder_id: field(row, pos[0]),
            date: field(row, pos[1]),
            time: field(row, pos[2]),
            topic: field(row, pos[3]),
            session_incharge: field(row, pos[4]),
            session_type: field(row, pos[5]),
            session_report: field(row, pos[6]),
            feedback: field(row, pos[7]),
            next_recommend: field(row, pos[8]),
            progress_link: field(row, pos[9]),
        })
        .filter(|r| !r.coder_id.is_empty())
        .collect())
}

/// Date formats seen in the exported sheets.
pub fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw.trim(), fmt).ok())
}
