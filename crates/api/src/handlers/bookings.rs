//! # Booking Handlers
//!
//! Availability lookups, booking creation with its guards, cancellations,
//! absences, and the coach schedule board.
//!
//! Booking creation applies three checks, in order:
//!
//! 1. the slot must exist on the requested date (valid grid label, school
//!    open that weekday),
//! 2. the student must not already hold a live booking for the same
//!    date+time (duplicate guard), nor a fixed-schedule assignment covering
//!    that weekday+time (their regular class),
//! 3. the slot must have a free seat, recounted transactionally inside the
//!    repository so concurrent requests cannot both take the last seat.
//!
//! The first two checks use the pure helpers from
//! `classtrack_core::availability`; the third is enforced by the database
//! layer and by a partial unique index on live bookings.

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use chrono::{Datelike, NaiveDate, Utc};
use classtrack_core::{
    availability,
    errors::{TrackError, TrackResult},
    models::booking::{
        Booking, CancelBookingRequest, CancelBookingResponse, CreateBookingRequest,
        CreateBookingResponse, GetSlotsResponse, ListBookingsResponse,
    },
    models::schedule::{
        Absence, CreateAbsenceRequest, CreateAbsenceResponse, CreateFixedSlotRequest,
        CreateFixedSlotResponse, FixedSlot, GetCoachScheduleResponse,
    },
};
use classtrack_db::models::{DbAbsence, DbBooking, DbFixedSlot, weekday_to_db};
use serde::Deserialize;
use std::sync::Arc;

use crate::{ApiState, middleware::auth, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct GetSlotsQuery {
    pub coach: String,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub coder_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CoachScheduleQuery {
    pub coach: String,
}

fn bookings_into_domain(rows: Vec<DbBooking>) -> TrackResult<Vec<Booking>> {
    rows.into_iter().map(|b| b.into_domain()).collect()
}

fn fixed_into_domain(rows: Vec<DbFixedSlot>) -> TrackResult<Vec<FixedSlot>> {
    rows.into_iter().map(|f| f.into_domain()).collect()
}

fn absences_into_domain(rows: Vec<DbAbsence>) -> Vec<Absence> {
    rows.into_iter().map(|a| a.into_domain()).collect()
}

/// Remaining seats per slot for a coach's day.
#[axum::debug_handler]
pub async fn get_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<GetSlotsQuery>,
) -> Result<Json<GetSlotsResponse>, AppError> {
    let fixed = classtrack_db::repositories::schedule::get_fixed_slots_by_coach(
        &state.db_pool,
        &query.coach,
    )
    .await
    .map_err(TrackError::Database)?;
    let bookings = classtrack_db::repositories::booking::get_bookings_for_coach_date(
        &state.db_pool,
        &query.coach,
        query.date,
    )
    .await
    .map_err(TrackError::Database)?;
    let absences =
        classtrack_db::repositories::schedule::get_absences_for_date(&state.db_pool, query.date)
            .await
            .map_err(TrackError::Database)?;

    let slots = availability::availability_for_date(
        &query.coach,
        query.date,
        &fixed_into_domain(fixed)?,
        &bookings_into_domain(bookings)?,
        &absences_into_domain(absences),
    );

    Ok(Json(GetSlotsResponse {
        coach: query.coach,
        session_date: query.date,
        slots,
    }))
}

/// A student's live bookings.
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ListBookingsResponse>, AppError> {
    let bookings = classtrack_db::repositories::booking::get_live_bookings_by_coder(
        &state.db_pool,
        &query.coder_id,
    )
    .await
    .map_err(TrackError::Database)?;

    Ok(Json(ListBookingsResponse {
        bookings: bookings_into_domain(bookings)?,
    }))
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    // Normalize once; lookups, guards, and the insert all see the same
    // canonical values.
    let coder_id = payload.coder_id.trim();
    let coach = payload.coach.trim();
    let time_slot = payload.time_slot.trim();

    if !availability::is_master_slot(time_slot) {
        return Err(AppError(TrackError::Validation(format!(
            "Unknown time slot: {}",
            time_slot
        ))));
    }
    if !availability::slots_for_weekday(payload.session_date.weekday()).contains(&time_slot) {
        return Err(AppError(TrackError::Validation(format!(
            "No classes on {} {}",
            payload.session_date.weekday(),
            payload.session_date
        ))));
    }

    classtrack_db::repositories::student::get_student_by_coder_id(&state.db_pool, coder_id)
        .await
        .map_err(TrackError::Database)?
        .ok_or_else(|| TrackError::NotFound(format!("Student {} not found", coder_id)))?;

    // Duplicate guard: one live booking per (student, date, time).
    let existing =
        classtrack_db::repositories::booking::get_live_bookings_by_coder(&state.db_pool, coder_id)
            .await
            .map_err(TrackError::Database)?;
    let existing = bookings_into_domain(existing)?;
    if availability::duplicate_booking(&existing, coder_id, payload.session_date, time_slot)
        .is_some()
    {
        return Err(AppError(TrackError::Conflict(format!(
            "{} already holds a booking for {} {}",
            coder_id, payload.session_date, time_slot
        ))));
    }

    // Regular-class guard: a fixed-schedule slot is not bookable ad hoc.
    let fixed =
        classtrack_db::repositories::schedule::get_fixed_slots_by_coder(&state.db_pool, coder_id)
            .await
            .map_err(TrackError::Database)?;
    let fixed = fixed_into_domain(fixed)?;
    if availability::regular_slot(&fixed, coder_id, payload.session_date, time_slot).is_some() {
        return Err(AppError(TrackError::Conflict(format!(
            "{} already attends {} {} as a regular class",
            coder_id,
            payload.session_date.weekday(),
            time_slot
        ))));
    }

    // Capacity is enforced transactionally inside the repository.
    let booking = classtrack_db::repositories::booking::create_booking(
        &state.db_pool,
        coder_id,
        coach,
        payload.session_date,
        time_slot,
        payload.note.as_deref().map(str::trim),
    )
    .await?;
    let booking = booking.into_domain()?;

    Ok(Json(CreateBookingResponse {
        id: booking.id,
        status: booking.status,
        created_at: booking.created_at,
    }))
}

/// Cancels exactly one live booking matching (coder_id, date, time_slot).
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    // Bookings were stored with trimmed fields; match them the same way.
    let coder_id = payload.coder_id.trim();
    let time_slot = payload.time_slot.trim();

    let cancelled = classtrack_db::repositories::booking::cancel_booking(
        &state.db_pool,
        coder_id,
        payload.session_date,
        time_slot,
    )
    .await
    .map_err(TrackError::Database)?
    .ok_or_else(|| {
        TrackError::NotFound(format!(
            "No live booking for {} on {} {}",
            coder_id, payload.session_date, time_slot
        ))
    })?;

    Ok(Json(CancelBookingResponse { id: cancelled }))
}

/// Files a one-off absence against a fixed-schedule slot. The fixed
/// assignment is kept; the seat is freed for the resolved date only.
#[axum::debug_handler]
pub async fn create_absence(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAbsenceRequest>,
) -> Result<Json<CreateAbsenceResponse>, AppError> {
    let coder_id = payload.coder_id.trim();
    let time_slot = payload.time_slot.trim();
    if !availability::is_master_slot(time_slot) {
        return Err(AppError(TrackError::Validation(format!(
            "Unknown time slot: {}",
            time_slot
        ))));
    }

    // An absence filed by weekday resolves to the nearest calendar date
    // on or after today falling on that weekday.
    let session_date = match (payload.session_date, payload.weekday) {
        (Some(date), _) => date,
        (None, Some(weekday)) => {
            availability::next_weekday_occurrence(Utc::now().date_naive(), weekday)
        }
        (None, None) => {
            return Err(AppError(TrackError::Validation(
                "Either session_date or weekday must be provided".to_string(),
            )));
        }
    };

    classtrack_db::repositories::student::get_student_by_coder_id(&state.db_pool, coder_id)
        .await
        .map_err(TrackError::Database)?
        .ok_or_else(|| TrackError::NotFound(format!("Student {} not found", coder_id)))?;

    // An absence is filed against the student's own fixed-schedule slot;
    // there is nothing to be absent from otherwise.
    let fixed =
        classtrack_db::repositories::schedule::get_fixed_slots_by_coder(&state.db_pool, coder_id)
            .await
            .map_err(TrackError::Database)?;
    let fixed = fixed_into_domain(fixed)?;
    if availability::regular_slot(&fixed, coder_id, session_date, time_slot).is_none() {
        return Err(AppError(TrackError::Validation(format!(
            "{} has no fixed {} class at {}",
            coder_id,
            session_date.weekday(),
            time_slot
        ))));
    }

    let reason = payload.reason.as_deref().unwrap_or("personal leave");
    let absence = classtrack_db::repositories::schedule::create_absence(
        &state.db_pool,
        coder_id,
        session_date,
        time_slot,
        reason.trim(),
    )
    .await?;

    Ok(Json(CreateAbsenceResponse {
        id: absence.id,
        session_date: absence.session_date,
    }))
}

/// The coach schedule board: fixed-schedule occupants grouped per
/// (weekday, time) cell with seat counts.
#[axum::debug_handler]
pub async fn get_coach_schedule(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<CoachScheduleQuery>,
) -> Result<Json<GetCoachScheduleResponse>, AppError> {
    let entries =
        classtrack_db::repositories::schedule::get_roster_by_coach(&state.db_pool, &query.coach)
            .await
            .map_err(TrackError::Database)?;
    let entries = entries
        .into_iter()
        .map(|e| e.into_domain())
        .collect::<TrackResult<Vec<_>>>()?;

    Ok(Json(GetCoachScheduleResponse {
        coach: query.coach,
        slots: availability::group_roster(&entries),
    }))
}

/// Assigns a student to a recurring weekly slot.
#[axum::debug_handler]
pub async fn create_fixed_slot(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateFixedSlotRequest>,
) -> Result<Json<CreateFixedSlotResponse>, AppError> {
    auth::require_write_key(&state, &headers)?;

    let time_slot = payload.time_slot.trim();
    if !availability::slots_for_weekday(payload.weekday).contains(&time_slot) {
        return Err(AppError(TrackError::Validation(format!(
            "No {} slot on {}",
            time_slot, payload.weekday
        ))));
    }

    classtrack_db::repositories::student::get_student_by_coder_id(&state.db_pool, &payload.coder_id)
        .await
        .map_err(TrackError::Database)?
        .ok_or_else(|| TrackError::NotFound(format!("Student {} not found", payload.coder_id)))?;

    let slot = classtrack_db::repositories::schedule::create_fixed_slot(
        &state.db_pool,
        payload.coder_id.trim(),
        payload.coach.trim(),
        weekday_to_db(payload.weekday),
        time_slot,
    )
    .await?;

    Ok(Json(CreateFixedSlotResponse {
        id: slot.id,
        created_at: slot.created_at,
    }))
}
