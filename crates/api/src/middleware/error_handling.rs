//! # Error Handling Middleware
//!
//! Maps domain-specific `TrackError` values to HTTP status codes and JSON
//! error responses so the whole API fails the same way. The legacy gateway
//! funneled every failure into a `{success:false, error}` payload surfaced
//! as a blocking alert; here each error class carries its own status code
//! and a `{"error": msg}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use classtrack_core::errors::TrackError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `TrackError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub TrackError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            TrackError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackError::Validation(_) => StatusCode::BAD_REQUEST,
            TrackError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TrackError::Authorization(_) => StatusCode::FORBIDDEN,
            TrackError::Conflict(_) => StatusCode::CONFLICT,
            TrackError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TrackError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Allows using `?` with functions that return `Result<T, TrackError>` in
/// handlers that return `Result<T, AppError>`.
impl From<TrackError> for AppError {
    fn from(err: TrackError) -> Self {
        AppError(err)
    }
}

/// Wraps raw `eyre` reports (database plumbing) as `TrackError::Database`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TrackError::Database(err))
    }
}

/// Converts a `TrackError` straight into an HTTP response, for call sites
/// that build responses manually instead of bubbling an `AppError` up.
pub fn map_error(err: TrackError) -> Response {
    AppError(err).into_response()
}
