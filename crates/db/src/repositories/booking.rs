use crate::models::{DbBooking, weekday_to_db};
use chrono::{Datelike, NaiveDate, Utc};
use classtrack_core::availability::SEAT_CAPACITY;
use classtrack_core::errors::{TrackError, TrackResult};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Creates a booking with server-side capacity enforcement.
///
/// The insert runs in a transaction holding a per-(coach, date, slot)
/// advisory lock, so two racing requests recount occupancy serially and
/// the second one sees the first one's seat. Occupancy counts fixed-slot
/// holders without an absence on that date plus live bookings, the same
/// rule as `classtrack_core::availability::occupied_seats`.
pub async fn create_booking(
    pool: &Pool<Postgres>,
    coder_id: &str,
    coach: &str,
    session_date: NaiveDate,
    time_slot: &str,
    note: Option<&str>,
) -> TrackResult<DbBooking> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let weekday = weekday_to_db(session_date.weekday());

    let mut tx = pool.begin().await.map_err(|e| TrackError::Database(e.into()))?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(format!("{}|{}|{}", coach, session_date, time_slot))
        .execute(&mut *tx)
        .await
        .map_err(|e| TrackError::Database(e.into()))?;

    let occupied: i64 = sqlx::query_scalar(
        r#"
        SELECT
            (SELECT COUNT(*) FROM fixed_slots f
             WHERE f.coach = $1 AND f.weekday = $2 AND f.time_slot = $3
               AND NOT EXISTS (
                   SELECT 1 FROM absences a
                   WHERE a.coder_id = f.coder_id
                     AND a.session_date = $4
                     AND a.time_slot = $3))
            +
            (SELECT COUNT(*) FROM bookings b
             WHERE b.coach = $1 AND b.session_date = $4 AND b.time_slot = $3
               AND b.status <> 'cancelled')
        "#,
    )
    .bind(coach)
    .bind(weekday)
    .bind(time_slot)
    .bind(session_date)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| TrackError::Database(e.into()))?;

    if occupied >= SEAT_CAPACITY as i64 {
        return Err(TrackError::Conflict(format!(
            "Slot {} on {} with {} is full",
            time_slot, session_date, coach
        )));
    }

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings
            (id, coder_id, coach, session_date, time_slot, note, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'confirmed', $7)
        RETURNING id, coder_id, coach, session_date, time_slot, note, status, created_at
        "#,
    )
    .bind(id)
    .bind(coder_id)
    .bind(coach)
    .bind(session_date)
    .bind(time_slot)
    .bind(note)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("uniq_live_booking") => {
            TrackError::Conflict(format!(
                "{} already holds a booking for {} {}",
                coder_id, session_date, time_slot
            ))
        }
        _ => TrackError::Database(e.into()),
    })?;

    tx.commit().await.map_err(|e| TrackError::Database(e.into()))?;

    tracing::debug!("Booking created: id={}, coder_id={}", booking.id, coder_id);
    Ok(booking)
}

/// A student's non-cancelled bookings, soonest first.
pub async fn get_live_bookings_by_coder(
    pool: &Pool<Postgres>,
    coder_id: &str,
) -> eyre::Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, coder_id, coach, session_date, time_slot, note, status, created_at
        FROM bookings
        WHERE coder_id = $1 AND status <> 'cancelled'
        ORDER BY session_date ASC, time_slot ASC
        "#,
    )
    .bind(coder_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_bookings_for_coach_date(
    pool: &Pool<Postgres>,
    coach: &str,
    session_date: NaiveDate,
) -> eyre::Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, coder_id, coach, session_date, time_slot, note, status, created_at
        FROM bookings
        WHERE coach = $1 AND session_date = $2
        ORDER BY time_slot ASC, created_at ASC
        "#,
    )
    .bind(coach)
    .bind(session_date)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Cancels exactly one live booking matching (coder_id, date, time_slot).
/// Returns the cancelled booking's id, or `None` when nothing matched.
pub async fn cancel_booking(
    pool: &Pool<Postgres>,
    coder_id: &str,
    session_date: NaiveDate,
    time_slot: &str,
) -> eyre::Result<Option<Uuid>> {
    let cancelled = sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE bookings
        SET status = 'cancelled'
        WHERE id = (
            SELECT id FROM bookings
            WHERE coder_id = $1 AND session_date = $2 AND time_slot = $3
              AND status <> 'cancelled'
            ORDER BY created_at ASC
            LIMIT 1
        )
        RETURNING id
        "#,
    )
    .bind(coder_id)
    .bind(session_date)
    .bind(time_slot)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = cancelled {
        tracing::debug!("Booking cancelled: id={}, coder_id={}", id, coder_id);
    }
    Ok(cancelled)
}
