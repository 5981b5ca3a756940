use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub coder_id: String,
    pub nickname: String,
    pub fullname: String,
    pub status: String,
    pub course: String,
    pub course_status: String,
    pub program: Option<String>,
    pub project_list_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub coder_id: String,
    pub nickname: String,
    pub fullname: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub course_status: String,
    pub program: Option<String>,
    /// When omitted a parent password is generated server-side and
    /// returned once in the response.
    pub parent_password: Option<String>,
}

fn default_status() -> String {
    "Enrolled".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentResponse {
    pub coder_id: String,
    /// Present only when the password was generated server-side.
    pub parent_password: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListStudentsResponse {
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateParentPasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProjectListRequest {
    pub project_list_url: String,
}

/// Six lowercase alphanumeric characters, matching the passwords the
/// school has historically handed out to parents.
pub fn generate_parent_password() -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..6)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}
