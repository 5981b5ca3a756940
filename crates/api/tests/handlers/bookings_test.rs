use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use classtrack_api::middleware::error_handling::AppError;
use classtrack_core::availability::{
    availability_for_date, duplicate_booking, is_master_slot, next_weekday_occurrence,
    regular_slot, slots_for_weekday,
};
use classtrack_core::errors::{TrackError, TrackResult};
use classtrack_core::models::booking::{
    CancelBookingResponse, CreateBookingResponse, GetSlotsResponse,
};
use classtrack_core::models::schedule::CreateAbsenceResponse;
use classtrack_db::models::{DbAbsence, DbBooking, DbFixedSlot, DbStudent, weekday_to_db};
use mockall::predicate;
use uuid::Uuid;

use crate::test_utils::TestContext;

// 2025-06-04 is a Wednesday, 2025-06-02 a Monday.
const WEDNESDAY: (i32, u32, u32) = (2025, 6, 4);
const MONDAY: (i32, u32, u32) = (2025, 6, 2);

fn date(ymd: (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap()
}

fn db_student(coder_id: &str) -> DbStudent {
    DbStudent {
        coder_id: coder_id.to_string(),
        nickname: "Mek".to_string(),
        fullname: "Mek Example".to_string(),
        status: "Enrolled".to_string(),
        course: "Python L1".to_string(),
        course_status: "In progress".to_string(),
        program: None,
        parent_password_hash: "$argon2id$fake".to_string(),
        project_list_url: None,
        created_at: Utc::now(),
    }
}

fn db_booking(coder_id: &str, coach: &str, session_date: NaiveDate, time_slot: &str) -> DbBooking {
    DbBooking {
        id: Uuid::new_v4(),
        coder_id: coder_id.to_string(),
        coach: coach.to_string(),
        session_date,
        time_slot: time_slot.to_string(),
        note: None,
        status: "confirmed".to_string(),
        created_at: Utc::now(),
    }
}

fn db_fixed_slot(coder_id: &str, coach: &str, session_date: NaiveDate, time_slot: &str) -> DbFixedSlot {
    DbFixedSlot {
        id: Uuid::new_v4(),
        coder_id: coder_id.to_string(),
        coach: coach.to_string(),
        weekday: weekday_to_db(session_date.weekday()),
        time_slot: time_slot.to_string(),
        created_at: Utc::now(),
    }
}

fn db_absence(coder_id: &str, session_date: NaiveDate, time_slot: &str) -> DbAbsence {
    DbAbsence {
        id: Uuid::new_v4(),
        coder_id: coder_id.to_string(),
        session_date,
        time_slot: time_slot.to_string(),
        reason: "sick".to_string(),
        created_at: Utc::now(),
    }
}

// Mirrors the booking-creation flow against the mock repositories: slot
// validation, student lookup, the duplicate and regular-class guards, and
// finally the capacity-checked insert.
async fn create_booking_wrapper(
    ctx: &mut TestContext,
    coder_id: &'static str,
    coach: &'static str,
    session_date: NaiveDate,
    time_slot: &'static str,
) -> Result<Json<CreateBookingResponse>, AppError> {
    let coder_id = coder_id.trim();
    let coach = coach.trim();
    let time_slot = time_slot.trim();

    if !is_master_slot(time_slot) {
        return Err(AppError(TrackError::Validation(format!(
            "Unknown time slot: {}",
            time_slot
        ))));
    }
    if !slots_for_weekday(session_date.weekday()).contains(&time_slot) {
        return Err(AppError(TrackError::Validation(format!(
            "No classes on {}",
            session_date.weekday()
        ))));
    }

    if ctx
        .student_repo
        .get_student_by_coder_id(coder_id)
        .await?
        .is_none()
    {
        return Err(AppError(TrackError::NotFound(format!(
            "Student {} not found",
            coder_id
        ))));
    }

    let live = ctx
        .booking_repo
        .get_live_bookings_by_coder(coder_id)
        .await?
        .into_iter()
        .map(DbBooking::into_domain)
        .collect::<TrackResult<Vec<_>>>()?;
    if duplicate_booking(&live, coder_id, session_date, time_slot).is_some() {
        return Err(AppError(TrackError::Conflict(
            "Student already has a booking for this slot".to_string(),
        )));
    }

    let fixed = ctx
        .schedule_repo
        .get_fixed_slots_by_coder(coder_id)
        .await?
        .into_iter()
        .map(DbFixedSlot::into_domain)
        .collect::<TrackResult<Vec<_>>>()?;
    if regular_slot(&fixed, coder_id, session_date, time_slot).is_some() {
        return Err(AppError(TrackError::Conflict(
            "This is the student's regular class".to_string(),
        )));
    }

    let booking = ctx
        .booking_repo
        .create_booking(coder_id, coach, session_date, time_slot, None)
        .await?;

    Ok(Json(CreateBookingResponse {
        id: booking.id,
        status: booking.status.parse().map_err(AppError)?,
        created_at: booking.created_at,
    }))
}

// Mirrors the slot-availability flow: seed records for the coach's day
// and fold them into per-slot seat counts.
async fn get_slots_wrapper(
    ctx: &mut TestContext,
    coach: &'static str,
    session_date: NaiveDate,
) -> Result<Json<GetSlotsResponse>, AppError> {
    let fixed = ctx
        .schedule_repo
        .get_fixed_slots_by_coach(coach)
        .await?
        .into_iter()
        .map(DbFixedSlot::into_domain)
        .collect::<TrackResult<Vec<_>>>()?;
    let bookings = ctx
        .booking_repo
        .get_bookings_for_coach_date(coach, session_date)
        .await?
        .into_iter()
        .map(DbBooking::into_domain)
        .collect::<TrackResult<Vec<_>>>()?;
    let absences = ctx
        .schedule_repo
        .get_absences_for_date(session_date)
        .await?
        .into_iter()
        .map(DbAbsence::into_domain)
        .collect::<Vec<_>>();

    Ok(Json(GetSlotsResponse {
        coach: coach.to_string(),
        session_date,
        slots: availability_for_date(coach, session_date, &fixed, &bookings, &absences),
    }))
}

async fn cancel_booking_wrapper(
    ctx: &mut TestContext,
    coder_id: &'static str,
    session_date: NaiveDate,
    time_slot: &'static str,
) -> Result<Json<CancelBookingResponse>, AppError> {
    let coder_id = coder_id.trim();
    let time_slot = time_slot.trim();

    match ctx
        .booking_repo
        .cancel_booking(coder_id, session_date, time_slot)
        .await?
    {
        Some(id) => Ok(Json(CancelBookingResponse { id })),
        None => Err(AppError(TrackError::NotFound(
            "No live booking matches".to_string(),
        ))),
    }
}

// Mirrors the absence-filing flow: slot validation, weekday-to-date
// resolution, student lookup, and the fixed-schedule membership check
// before the insert.
async fn create_absence_wrapper(
    ctx: &mut TestContext,
    coder_id: &'static str,
    session_date: Option<NaiveDate>,
    weekday: Option<Weekday>,
    time_slot: &'static str,
) -> Result<Json<CreateAbsenceResponse>, AppError> {
    let coder_id = coder_id.trim();
    let time_slot = time_slot.trim();
    if !is_master_slot(time_slot) {
        return Err(AppError(TrackError::Validation(format!(
            "Unknown time slot: {}",
            time_slot
        ))));
    }

    let session_date = match (session_date, weekday) {
        (Some(date), _) => date,
        (None, Some(weekday)) => next_weekday_occurrence(Utc::now().date_naive(), weekday),
        (None, None) => {
            return Err(AppError(TrackError::Validation(
                "Either session_date or weekday must be provided".to_string(),
            )));
        }
    };

    if ctx
        .student_repo
        .get_student_by_coder_id(coder_id)
        .await?
        .is_none()
    {
        return Err(AppError(TrackError::NotFound(format!(
            "Student {} not found",
            coder_id
        ))));
    }

    // An absence only makes sense against a held fixed-schedule slot.
    let fixed = ctx
        .schedule_repo
        .get_fixed_slots_by_coder(coder_id)
        .await?
        .into_iter()
        .map(DbFixedSlot::into_domain)
        .collect::<TrackResult<Vec<_>>>()?;
    if regular_slot(&fixed, coder_id, session_date, time_slot).is_none() {
        return Err(AppError(TrackError::Validation(format!(
            "{} has no fixed {} class at {}",
            coder_id,
            session_date.weekday(),
            time_slot
        ))));
    }

    let absence = ctx
        .schedule_repo
        .create_absence(coder_id, session_date, time_slot, "personal leave")
        .await?;

    Ok(Json(CreateAbsenceResponse {
        id: absence.id,
        session_date: absence.session_date,
    }))
}

#[tokio::test]
async fn test_create_booking_success() {
    let mut ctx = TestContext::new();
    let session_date = date(WEDNESDAY);

    ctx.student_repo
        .expect_get_student_by_coder_id()
        .with(predicate::eq("C001"))
        .returning(|id| Ok(Some(db_student(id))));
    ctx.booking_repo
        .expect_get_live_bookings_by_coder()
        .with(predicate::eq("C001"))
        .returning(|_| Ok(vec![]));
    ctx.schedule_repo
        .expect_get_fixed_slots_by_coder()
        .with(predicate::eq("C001"))
        .returning(|_| Ok(vec![]));
    ctx.booking_repo
        .expect_create_booking()
        .withf(|coder_id, coach, _, time_slot, _| {
            coder_id == "C001" && coach == "Coach Ellie" && time_slot == "11:00 - 12:30"
        })
        .returning(move |coder_id, coach, d, slot, _| Ok(db_booking(coder_id, coach, d, slot)));

    let result =
        create_booking_wrapper(&mut ctx, "C001", "Coach Ellie", session_date, "11:00 - 12:30")
            .await;

    let Json(response) = result.expect("booking should succeed");
    assert_eq!(response.status.to_string(), "confirmed");
}

#[tokio::test]
async fn test_create_booking_unknown_time_slot() {
    let mut ctx = TestContext::new();

    let result =
        create_booking_wrapper(&mut ctx, "C001", "Coach Ellie", date(WEDNESDAY), "10:00 - 11:00")
            .await;

    let err = result.err().expect("should be rejected");
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_booking_rejected_on_monday() {
    let mut ctx = TestContext::new();

    let result =
        create_booking_wrapper(&mut ctx, "C001", "Coach Ellie", date(MONDAY), "11:00 - 12:30")
            .await;

    let err = result.err().expect("should be rejected");
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_booking_unknown_student() {
    let mut ctx = TestContext::new();

    ctx.student_repo
        .expect_get_student_by_coder_id()
        .with(predicate::eq("C404"))
        .returning(|_| Ok(None));

    let result =
        create_booking_wrapper(&mut ctx, "C404", "Coach Ellie", date(WEDNESDAY), "11:00 - 12:30")
            .await;

    let err = result.err().expect("should be rejected");
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_booking_duplicate_rejected() {
    let mut ctx = TestContext::new();
    let session_date = date(WEDNESDAY);

    ctx.student_repo
        .expect_get_student_by_coder_id()
        .returning(|id| Ok(Some(db_student(id))));
    ctx.booking_repo
        .expect_get_live_bookings_by_coder()
        .returning(move |_| {
            Ok(vec![db_booking("C001", "Coach Sup", session_date, "11:00 - 12:30")])
        });

    // Same date and time with a different coach is still a duplicate.
    let result =
        create_booking_wrapper(&mut ctx, "C001", "Coach Ellie", session_date, "11:00 - 12:30")
            .await;

    let err = result.err().expect("should be rejected");
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_booking_regular_class_rejected() {
    let mut ctx = TestContext::new();
    let session_date = date(WEDNESDAY);

    ctx.student_repo
        .expect_get_student_by_coder_id()
        .returning(|id| Ok(Some(db_student(id))));
    ctx.booking_repo
        .expect_get_live_bookings_by_coder()
        .returning(|_| Ok(vec![]));
    ctx.schedule_repo
        .expect_get_fixed_slots_by_coder()
        .returning(move |_| {
            Ok(vec![db_fixed_slot("C001", "Coach Ellie", session_date, "11:00 - 12:30")])
        });

    let result =
        create_booking_wrapper(&mut ctx, "C001", "Coach Ellie", session_date, "11:00 - 12:30")
            .await;

    let err = result.err().expect("should be rejected");
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_booking_full_slot_conflict_propagates() {
    let mut ctx = TestContext::new();
    let session_date = date(WEDNESDAY);

    ctx.student_repo
        .expect_get_student_by_coder_id()
        .returning(|id| Ok(Some(db_student(id))));
    ctx.booking_repo
        .expect_get_live_bookings_by_coder()
        .returning(|_| Ok(vec![]));
    ctx.schedule_repo
        .expect_get_fixed_slots_by_coder()
        .returning(|_| Ok(vec![]));
    // The capacity recount inside the transaction found the slot full.
    ctx.booking_repo
        .expect_create_booking()
        .returning(|_, _, _, _, _| {
            Err(TrackError::Conflict("No seats left for this slot".to_string()))
        });

    let result =
        create_booking_wrapper(&mut ctx, "C001", "Coach Ellie", session_date, "11:00 - 12:30")
            .await;

    let err = result.err().expect("should be rejected");
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_slots_counts_all_record_kinds() {
    let mut ctx = TestContext::new();
    let session_date = date(WEDNESDAY);

    // One fixed holder (with a filed absence) and two ad hoc bookings at
    // "11:00 - 12:30"; the absence frees the fixed seat.
    ctx.schedule_repo
        .expect_get_fixed_slots_by_coach()
        .with(predicate::eq("Coach Ellie"))
        .returning(move |coach| {
            Ok(vec![db_fixed_slot("C001", coach, session_date, "11:00 - 12:30")])
        });
    ctx.booking_repo
        .expect_get_bookings_for_coach_date()
        .returning(move |coach, d| {
            Ok(vec![
                db_booking("C002", coach, d, "11:00 - 12:30"),
                db_booking("C003", coach, d, "11:00 - 12:30"),
            ])
        });
    ctx.schedule_repo
        .expect_get_absences_for_date()
        .returning(move |d| Ok(vec![db_absence("C001", d, "11:00 - 12:30")]));

    let Json(response) = get_slots_wrapper(&mut ctx, "Coach Ellie", session_date)
        .await
        .expect("slots should resolve");

    assert_eq!(response.slots.len(), 4);
    let target = response
        .slots
        .iter()
        .find(|s| s.time_slot == "11:00 - 12:30")
        .unwrap();
    assert_eq!(target.available_seats, 2);
    let open = response
        .slots
        .iter()
        .find(|s| s.time_slot == "09:00 - 10:30")
        .unwrap();
    assert_eq!(open.available_seats, 4);
}

#[tokio::test]
async fn test_get_slots_empty_on_monday() {
    let mut ctx = TestContext::new();

    ctx.schedule_repo
        .expect_get_fixed_slots_by_coach()
        .returning(|_| Ok(vec![]));
    ctx.booking_repo
        .expect_get_bookings_for_coach_date()
        .returning(|_, _| Ok(vec![]));
    ctx.schedule_repo
        .expect_get_absences_for_date()
        .returning(|_| Ok(vec![]));

    let Json(response) = get_slots_wrapper(&mut ctx, "Coach Ellie", date(MONDAY))
        .await
        .expect("slots should resolve");

    assert!(response.slots.is_empty());
}

#[tokio::test]
async fn test_cancel_booking_success() {
    let mut ctx = TestContext::new();
    let booking_id = Uuid::new_v4();

    ctx.booking_repo
        .expect_cancel_booking()
        .with(
            predicate::eq("C001"),
            predicate::eq(date(WEDNESDAY)),
            predicate::eq("11:00 - 12:30"),
        )
        .returning(move |_, _, _| Ok(Some(booking_id)));

    let Json(response) = cancel_booking_wrapper(&mut ctx, "C001", date(WEDNESDAY), "11:00 - 12:30")
        .await
        .expect("cancel should succeed");

    assert_eq!(response.id, booking_id);
}

#[tokio::test]
async fn test_cancel_booking_not_found() {
    let mut ctx = TestContext::new();

    ctx.booking_repo
        .expect_cancel_booking()
        .returning(|_, _, _| Ok(None));

    let result = cancel_booking_wrapper(&mut ctx, "C001", date(WEDNESDAY), "11:00 - 12:30").await;

    let err = result.err().expect("should be rejected");
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_booking_normalizes_padded_fields() {
    let mut ctx = TestContext::new();
    let booking_id = Uuid::new_v4();

    // Bookings are stored trimmed; a padded cancel request must still
    // find them.
    ctx.booking_repo
        .expect_cancel_booking()
        .with(
            predicate::eq("C001"),
            predicate::eq(date(WEDNESDAY)),
            predicate::eq("11:00 - 12:30"),
        )
        .returning(move |_, _, _| Ok(Some(booking_id)));

    let Json(response) =
        cancel_booking_wrapper(&mut ctx, " C001 ", date(WEDNESDAY), " 11:00 - 12:30 ")
            .await
            .expect("cancel should succeed");

    assert_eq!(response.id, booking_id);
}

#[tokio::test]
async fn test_create_absence_requires_fixed_membership() {
    let mut ctx = TestContext::new();

    ctx.student_repo
        .expect_get_student_by_coder_id()
        .returning(|id| Ok(Some(db_student(id))));
    // No fixed-schedule assignment at all; the insert must never run.
    ctx.schedule_repo
        .expect_get_fixed_slots_by_coder()
        .returning(|_| Ok(vec![]));

    let result = create_absence_wrapper(
        &mut ctx,
        "C001",
        None,
        Some(Weekday::Sat),
        "09:00 - 10:30",
    )
    .await;

    let err = result.err().expect("should be rejected");
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_absence_rejects_other_slot() {
    let mut ctx = TestContext::new();
    let session_date = date(WEDNESDAY);

    ctx.student_repo
        .expect_get_student_by_coder_id()
        .returning(|id| Ok(Some(db_student(id))));
    // Holds a Wednesday slot, but not the one the absence names.
    ctx.schedule_repo
        .expect_get_fixed_slots_by_coder()
        .returning(move |_| {
            Ok(vec![db_fixed_slot("C001", "Coach Ellie", session_date, "11:00 - 12:30")])
        });

    let result =
        create_absence_wrapper(&mut ctx, "C001", Some(session_date), None, "13:00 - 15:00").await;

    let err = result.err().expect("should be rejected");
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_absence_for_held_fixed_slot() {
    let mut ctx = TestContext::new();
    let session_date = date(WEDNESDAY);

    ctx.student_repo
        .expect_get_student_by_coder_id()
        .returning(|id| Ok(Some(db_student(id))));
    ctx.schedule_repo
        .expect_get_fixed_slots_by_coder()
        .returning(move |_| {
            Ok(vec![db_fixed_slot("C001", "Coach Ellie", session_date, "11:00 - 12:30")])
        });
    ctx.schedule_repo
        .expect_create_absence()
        .with(
            predicate::eq("C001"),
            predicate::eq(session_date),
            predicate::eq("11:00 - 12:30"),
            predicate::eq("personal leave"),
        )
        .returning(|coder_id, d, slot, _| Ok(db_absence(coder_id, d, slot)));

    let Json(response) =
        create_absence_wrapper(&mut ctx, "C001", Some(session_date), None, "11:00 - 12:30")
            .await
            .expect("absence should be filed");

    assert_eq!(response.session_date, session_date);
}

#[tokio::test]
async fn test_create_absence_by_weekday_resolves_forward() {
    let mut ctx = TestContext::new();
    let today = Utc::now().date_naive();

    ctx.student_repo
        .expect_get_student_by_coder_id()
        .returning(|id| Ok(Some(db_student(id))));
    // Membership on the named weekday, built from a known Wednesday.
    ctx.schedule_repo
        .expect_get_fixed_slots_by_coder()
        .returning(|_| {
            Ok(vec![db_fixed_slot("C001", "Coach Ellie", date(WEDNESDAY), "11:00 - 12:30")])
        });
    ctx.schedule_repo
        .expect_create_absence()
        .returning(|coder_id, d, slot, _| Ok(db_absence(coder_id, d, slot)));

    let Json(response) = create_absence_wrapper(
        &mut ctx,
        "C001",
        None,
        Some(Weekday::Wed),
        "11:00 - 12:30",
    )
    .await
    .expect("absence should be filed");

    assert_eq!(response.session_date.weekday(), Weekday::Wed);
    assert!(response.session_date >= today);
}
