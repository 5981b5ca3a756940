use axum::{Json, extract::State};
use classtrack_core::{
    errors::TrackError,
    models::coach::{CoachLoginRequest, LoginResponse, ParentLoginRequest, Role},
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn coach_login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CoachLoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    // Missing account and wrong password fail identically.
    classtrack_db::repositories::coach::get_coach_by_name(&state.db_pool, &payload.name)
        .await
        .map_err(TrackError::Database)?
        .ok_or_else(|| TrackError::Authentication("Invalid coach name or password".to_string()))?;

    let is_valid = classtrack_db::repositories::coach::verify_coach_password(
        &state.db_pool,
        &payload.name,
        &payload.password,
    )
    .await
    .map_err(TrackError::Database)?;
    if !is_valid {
        return Err(AppError(TrackError::Authentication(
            "Invalid coach name or password".to_string(),
        )));
    }

    Ok(Json(LoginResponse {
        role: Role::Coach,
        coder_id: None,
    }))
}

#[axum::debug_handler]
pub async fn parent_login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ParentLoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let student =
        classtrack_db::repositories::student::get_student_by_coder_id(&state.db_pool, &payload.coder_id)
            .await
            .map_err(TrackError::Database)?
            .ok_or_else(|| {
                TrackError::Authentication("Invalid coder ID or password".to_string())
            })?;

    let is_valid = classtrack_db::repositories::student::verify_parent_password(
        &state.db_pool,
        &payload.coder_id,
        &payload.password,
    )
    .await
    .map_err(TrackError::Database)?;
    if !is_valid {
        return Err(AppError(TrackError::Authentication(
            "Invalid coder ID or password".to_string(),
        )));
    }

    Ok(Json(LoginResponse {
        role: Role::Parent,
        coder_id: Some(student.coder_id),
    }))
}
