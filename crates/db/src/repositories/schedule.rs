use crate::models::{DbAbsence, DbFixedSlot, DbRosterEntry};
use chrono::{NaiveDate, Utc};
use classtrack_core::errors::{TrackError, TrackResult};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_fixed_slot(
    pool: &Pool<Postgres>,
    coder_id: &str,
    coach: &str,
    weekday: i16,
    time_slot: &str,
) -> TrackResult<DbFixedSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let slot = sqlx::query_as::<_, DbFixedSlot>(
        r#"
        INSERT INTO fixed_slots (id, coder_id, coach, weekday, time_slot, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, coder_id, coach, weekday, time_slot, created_at
        "#,
    )
    .bind(id)
    .bind(coder_id)
    .bind(coach)
    .bind(weekday)
    .bind(time_slot)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("uniq_fixed_slot") => {
            TrackError::Conflict(format!(
                "{} already has a fixed slot at that weekday and time",
                coder_id
            ))
        }
        _ => TrackError::Database(e.into()),
    })?;

    Ok(slot)
}

pub async fn get_fixed_slots_by_coach(
    pool: &Pool<Postgres>,
    coach: &str,
) -> eyre::Result<Vec<DbFixedSlot>> {
    let slots = sqlx::query_as::<_, DbFixedSlot>(
        r#"
        SELECT id, coder_id, coach, weekday, time_slot, created_at
        FROM fixed_slots
        WHERE coach = $1
        ORDER BY weekday ASC, time_slot ASC
        "#,
    )
    .bind(coach)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn get_fixed_slots_by_coder(
    pool: &Pool<Postgres>,
    coder_id: &str,
) -> eyre::Result<Vec<DbFixedSlot>> {
    let slots = sqlx::query_as::<_, DbFixedSlot>(
        r#"
        SELECT id, coder_id, coach, weekday, time_slot, created_at
        FROM fixed_slots
        WHERE coder_id = $1
        ORDER BY weekday ASC, time_slot ASC
        "#,
    )
    .bind(coder_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Fixed-slot rows joined with student nicknames for the schedule board.
pub async fn get_roster_by_coach(
    pool: &Pool<Postgres>,
    coach: &str,
) -> eyre::Result<Vec<DbRosterEntry>> {
    let entries = sqlx::query_as::<_, DbRosterEntry>(
        r#"
        SELECT f.coder_id, s.nickname, f.coach, f.weekday, f.time_slot
        FROM fixed_slots f
        JOIN students s ON s.coder_id = f.coder_id
        WHERE f.coach = $1
        ORDER BY f.weekday ASC, f.time_slot ASC, s.nickname ASC
        "#,
    )
    .bind(coach)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn create_absence(
    pool: &Pool<Postgres>,
    coder_id: &str,
    session_date: NaiveDate,
    time_slot: &str,
    reason: &str,
) -> TrackResult<DbAbsence> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let absence = sqlx::query_as::<_, DbAbsence>(
        r#"
        INSERT INTO absences (id, coder_id, session_date, time_slot, reason, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, coder_id, session_date, time_slot, reason, created_at
        "#,
    )
    .bind(id)
    .bind(coder_id)
    .bind(session_date)
    .bind(time_slot)
    .bind(reason)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("uniq_absence") => {
            TrackError::Conflict(format!(
                "Absence already filed for {} on {} {}",
                coder_id, session_date, time_slot
            ))
        }
        _ => TrackError::Database(e.into()),
    })?;

    tracing::debug!(
        "Absence filed: coder_id={}, date={}, slot={}",
        coder_id,
        session_date,
        time_slot
    );
    Ok(absence)
}

pub async fn get_absences_for_date(
    pool: &Pool<Postgres>,
    session_date: NaiveDate,
) -> eyre::Result<Vec<DbAbsence>> {
    let absences = sqlx::query_as::<_, DbAbsence>(
        r#"
        SELECT id, coder_id, session_date, time_slot, reason, created_at
        FROM absences
        WHERE session_date = $1
        ORDER BY time_slot ASC
        "#,
    )
    .bind(session_date)
    .fetch_all(pool)
    .await?;

    Ok(absences)
}
