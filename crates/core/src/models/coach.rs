use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Caller role granted by a successful login. Gating of coach-only
/// writes happens server-side via the write key; the role is returned
/// so the client can scope its own views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coach,
    Parent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachLoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentLoginRequest {
    pub coder_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub role: Role,
    /// Set for parent logins; identifies the child the session is scoped to.
    pub coder_id: Option<String>,
}
