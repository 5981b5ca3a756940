use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use classtrack_api::middleware::auth::{self, WRITE_KEY_HEADER};
use classtrack_api::middleware::error_handling::map_error;
use classtrack_core::errors::TrackError;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_error_handling_not_found() {
    let error = TrackError::NotFound("Student not found".to_string());
    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_handling_validation() {
    let error = TrackError::Validation("Invalid time slot".to_string());
    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_handling_authentication() {
    let error = TrackError::Authentication("Invalid password".to_string());
    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_error_handling_authorization() {
    let error = TrackError::Authorization("Missing write key".to_string());
    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_error_handling_conflict() {
    let error = TrackError::Conflict("Slot is full".to_string());
    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_database() {
    let error = TrackError::Database(eyre::eyre!("Database error"));
    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_error_handling_internal() {
    let error = TrackError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));
    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let error = TrackError::Conflict("No seats left for this slot".to_string());
    let response = map_error(error);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body["error"],
        serde_json::json!("Booking conflict: No seats left for this slot")
    );
}

#[tokio::test]
async fn test_hash_password() {
    let password = "test_password";
    let hashed = auth::hash_password(password).unwrap();

    // The hash is a PHC string, not the raw password.
    assert_ne!(hashed, password);
    assert!(hashed.starts_with("$argon2"));
}

#[tokio::test]
async fn test_verify_password_round_trip() {
    let password = "parent_secret";
    let hashed = auth::hash_password(password).unwrap();

    assert!(auth::verify_password(password, &hashed).unwrap());
    assert!(!auth::verify_password("wrong_password", &hashed).unwrap());
}

#[tokio::test]
async fn test_write_key_not_required_when_unset() {
    let ctx = TestContext::new();
    let state = ctx.build_state();
    let headers = HeaderMap::new();

    assert!(auth::require_write_key(&state, &headers).is_ok());
}

#[tokio::test]
async fn test_write_key_rejects_missing_header() {
    let ctx = TestContext::new();
    let state = ctx.build_state_with_key("sesame");
    let headers = HeaderMap::new();

    let err = auth::require_write_key(&state, &headers).unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_write_key_rejects_wrong_key() {
    let ctx = TestContext::new();
    let state = ctx.build_state_with_key("sesame");
    let mut headers = HeaderMap::new();
    headers.insert(WRITE_KEY_HEADER, HeaderValue::from_static("open"));

    let err = auth::require_write_key(&state, &headers).unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_write_key_accepts_matching_key() {
    let ctx = TestContext::new();
    let state = ctx.build_state_with_key("sesame");
    let mut headers = HeaderMap::new();
    headers.insert(WRITE_KEY_HEADER, HeaderValue::from_static("sesame"));

    assert!(auth::require_write_key(&state, &headers).is_ok());
}
