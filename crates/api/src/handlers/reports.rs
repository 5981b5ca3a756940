use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use chrono::Utc;
use classtrack_core::{
    errors::TrackError,
    models::report::{
        CreateReportRequest, CreateReportResponse, ListReportsResponse, UpdateReportRequest,
        UpdateReportResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::auth, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    /// When present, restricts the listing to one student's reports.
    pub coder_id: Option<String>,
}

#[axum::debug_handler]
pub async fn create_report(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateReportRequest>,
) -> Result<Json<CreateReportResponse>, AppError> {
    auth::require_write_key(&state, &headers)?;

    classtrack_db::repositories::student::get_student_by_coder_id(&state.db_pool, &payload.coder_id)
        .await
        .map_err(TrackError::Database)?
        .ok_or_else(|| TrackError::NotFound(format!("Student {} not found", payload.coder_id)))?;

    let report = classtrack_db::repositories::report::create_report(
        &state.db_pool,
        payload.coder_id.trim(),
        payload.session_date,
        payload.time_slot.as_deref().map(str::trim),
        payload.topic.trim(),
        payload.session_incharge.trim(),
        payload.session_type.trim(),
        payload.session_report.trim(),
        payload.feedback.as_deref().map(str::trim),
        payload.next_recommend.as_deref().map(str::trim),
        payload.progress_link.as_deref().map(str::trim),
    )
    .await
    .map_err(TrackError::Database)?;

    Ok(Json(CreateReportResponse {
        id: report.id,
        created_at: report.created_at,
    }))
}

#[axum::debug_handler]
pub async fn list_reports(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<ListReportsResponse>, AppError> {
    let reports = match &query.coder_id {
        Some(coder_id) => {
            classtrack_db::repositories::report::list_reports_by_coder(&state.db_pool, coder_id)
                .await
                .map_err(TrackError::Database)?
        }
        None => classtrack_db::repositories::report::list_reports(&state.db_pool)
            .await
            .map_err(TrackError::Database)?,
    };

    Ok(Json(ListReportsResponse {
        reports: reports.into_iter().map(|r| r.into_domain()).collect(),
    }))
}

#[axum::debug_handler]
pub async fn update_report(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<UpdateReportRequest>,
) -> Result<Json<UpdateReportResponse>, AppError> {
    auth::require_write_key(&state, &headers)?;

    classtrack_db::repositories::report::get_report_by_id(&state.db_pool, id)
        .await
        .map_err(TrackError::Database)?
        .ok_or_else(|| TrackError::NotFound(format!("Report {} not found", id)))?;

    classtrack_db::repositories::report::update_report(&state.db_pool, id, &payload)
        .await
        .map_err(TrackError::Database)?;

    Ok(Json(UpdateReportResponse {
        id,
        updated_at: Utc::now(),
    }))
}
