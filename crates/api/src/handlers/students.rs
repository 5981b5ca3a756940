use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use classtrack_core::{
    errors::TrackError,
    models::student::{
        CreateStudentRequest, CreateStudentResponse, ListStudentsResponse, Student,
        UpdateParentPasswordRequest, UpdateProjectListRequest, generate_parent_password,
    },
};
use std::sync::Arc;

use crate::{ApiState, middleware::auth, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_student(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<Json<CreateStudentResponse>, AppError> {
    auth::require_write_key(&state, &headers)?;

    let coder_id = payload.coder_id.trim();
    if coder_id.is_empty() {
        return Err(AppError(TrackError::Validation(
            "coder_id must not be empty".to_string(),
        )));
    }

    let existing =
        classtrack_db::repositories::student::get_student_by_coder_id(&state.db_pool, coder_id)
            .await
            .map_err(TrackError::Database)?;
    if existing.is_some() {
        return Err(AppError(TrackError::Conflict(format!(
            "Student {} already exists",
            coder_id
        ))));
    }

    // Generate a parent password when none is supplied; it is returned
    // once in the response and only its hash is stored.
    let (password, generated) = match &payload.parent_password {
        Some(p) => (p.clone(), false),
        None => (generate_parent_password(), true),
    };
    let password_hash = auth::hash_password(&password).map_err(TrackError::Database)?;

    let student = classtrack_db::repositories::student::create_student(
        &state.db_pool,
        coder_id,
        payload.nickname.trim(),
        payload.fullname.trim(),
        payload.status.trim(),
        payload.course.trim(),
        payload.course_status.trim(),
        payload.program.as_deref().map(str::trim),
        &password_hash,
    )
    .await
    .map_err(TrackError::Database)?;

    Ok(Json(CreateStudentResponse {
        coder_id: student.coder_id,
        parent_password: generated.then_some(password),
        created_at: student.created_at,
    }))
}

#[axum::debug_handler]
pub async fn list_students(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ListStudentsResponse>, AppError> {
    let students = classtrack_db::repositories::student::list_students(&state.db_pool)
        .await
        .map_err(TrackError::Database)?;

    Ok(Json(ListStudentsResponse {
        students: students.into_iter().map(|s| s.into_domain()).collect(),
    }))
}

#[axum::debug_handler]
pub async fn get_student(
    State(state): State<Arc<ApiState>>,
    Path(coder_id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let student =
        classtrack_db::repositories::student::get_student_by_coder_id(&state.db_pool, &coder_id)
            .await
            .map_err(TrackError::Database)?
            .ok_or_else(|| TrackError::NotFound(format!("Student {} not found", coder_id)))?;

    Ok(Json(student.into_domain()))
}

#[axum::debug_handler]
pub async fn update_parent_password(
    State(state): State<Arc<ApiState>>,
    Path(coder_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdateParentPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::require_write_key(&state, &headers)?;

    if payload.new_password.trim().is_empty() {
        return Err(AppError(TrackError::Validation(
            "new_password must not be empty".to_string(),
        )));
    }

    classtrack_db::repositories::student::get_student_by_coder_id(&state.db_pool, &coder_id)
        .await
        .map_err(TrackError::Database)?
        .ok_or_else(|| TrackError::NotFound(format!("Student {} not found", coder_id)))?;

    let password_hash =
        auth::hash_password(payload.new_password.trim()).map_err(TrackError::Database)?;
    classtrack_db::repositories::student::update_parent_password(
        &state.db_pool,
        &coder_id,
        &password_hash,
    )
    .await
    .map_err(TrackError::Database)?;

    Ok(Json(serde_json::json!({ "coder_id": coder_id })))
}

#[axum::debug_handler]
pub async fn update_project_list(
    State(state): State<Arc<ApiState>>,
    Path(coder_id): Path<String>,
    Json(payload): Json<UpdateProjectListRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    classtrack_db::repositories::student::get_student_by_coder_id(&state.db_pool, &coder_id)
        .await
        .map_err(TrackError::Database)?
        .ok_or_else(|| TrackError::NotFound(format!("Student {} not found", coder_id)))?;

    classtrack_db::repositories::student::update_project_list_url(
        &state.db_pool,
        &coder_id,
        payload.project_list_url.trim(),
    )
    .await
    .map_err(TrackError::Database)?;

    Ok(Json(serde_json::json!({ "coder_id": coder_id })))
}
