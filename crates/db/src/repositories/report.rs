use crate::models::DbReport;
use chrono::{NaiveDate, Utc};
use classtrack_core::models::report::UpdateReportRequest;
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub async fn create_report(
    pool: &Pool<Postgres>,
    coder_id: &str,
    session_date: NaiveDate,
    time_slot: Option<&str>,
    topic: &str,
    session_incharge: &str,
    session_type: &str,
    session_report: &str,
    feedback: Option<&str>,
    next_recommend: Option<&str>,
    progress_link: Option<&str>,
) -> Result<DbReport> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating report: id={}, coder_id={}", id, coder_id);

    let report = sqlx::query_as::<_, DbReport>(
        r#"
        INSERT INTO reports
            (id, coder_id, session_date, time_slot, topic, session_incharge,
             session_type, session_report, feedback, next_recommend,
             progress_link, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, coder_id, session_date, time_slot, topic, session_incharge,
                  session_type, session_report, feedback, next_recommend,
                  progress_link, created_at
        "#,
    )
    .bind(id)
    .bind(coder_id)
    .bind(session_date)
    .bind(time_slot)
    .bind(topic)
    .bind(session_incharge)
    .bind(session_type)
    .bind(session_report)
    .bind(feedback)
    .bind(next_recommend)
    .bind(progress_link)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(report)
}

pub async fn get_report_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbReport>> {
    let report = sqlx::query_as::<_, DbReport>(
        r#"
        SELECT id, coder_id, session_date, time_slot, topic, session_incharge,
               session_type, session_report, feedback, next_recommend,
               progress_link, created_at
        FROM reports
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(report)
}

pub async fn list_reports(pool: &Pool<Postgres>) -> Result<Vec<DbReport>> {
    let reports = sqlx::query_as::<_, DbReport>(
        r#"
        SELECT id, coder_id, session_date, time_slot, topic, session_incharge,
               session_type, session_report, feedback, next_recommend,
               progress_link, created_at
        FROM reports
        ORDER BY session_date DESC, created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(reports)
}

pub async fn list_reports_by_coder(
    pool: &Pool<Postgres>,
    coder_id: &str,
) -> Result<Vec<DbReport>> {
    let reports = sqlx::query_as::<_, DbReport>(
        r#"
        SELECT id, coder_id, session_date, time_slot, topic, session_incharge,
               session_type, session_report, feedback, next_recommend,
               progress_link, created_at
        FROM reports
        WHERE coder_id = $1
        ORDER BY session_date DESC, created_at DESC
        "#,
    )
    .bind(coder_id)
    .fetch_all(pool)
    .await?;

    Ok(reports)
}

/// Applies a partial update; fields absent from the request keep their
/// stored value.
pub async fn update_report(
    pool: &Pool<Postgres>,
    id: Uuid,
    updates: &UpdateReportRequest,
) -> Result<DbReport> {
    let current = get_report_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Report not found: {}", id))?;

    let session_date = updates.session_date.unwrap_or(current.session_date);
    let time_slot = updates.time_slot.as_deref().or(current.time_slot.as_deref());
    let topic = updates.topic.as_deref().unwrap_or(&current.topic);
    let session_incharge = updates
        .session_incharge
        .as_deref()
        .unwrap_or(&current.session_incharge);
    let session_type = updates
        .session_type
        .as_deref()
        .unwrap_or(&current.session_type);
    let session_report = updates
        .session_report
        .as_deref()
        .unwrap_or(&current.session_report);
    let feedback = updates.feedback.as_deref().or(current.feedback.as_deref());
    let next_recommend = updates
        .next_recommend
        .as_deref()
        .or(current.next_recommend.as_deref());
    let progress_link = updates
        .progress_link
        .as_deref()
        .or(current.progress_link.as_deref());

    let updated = sqlx::query_as::<_, DbReport>(
        r#"
        UPDATE reports
        SET session_date = $2, time_slot = $3, topic = $4, session_incharge = $5,
            session_type = $6, session_report = $7, feedback = $8,
            next_recommend = $9, progress_link = $10
        WHERE id = $1
        RETURNING id, coder_id, session_date, time_slot, topic, session_incharge,
                  session_type, session_report, feedback, next_recommend,
                  progress_link, created_at
        "#,
    )
    .bind(id)
    .bind(session_date)
    .bind(time_slot)
    .bind(topic)
    .bind(session_incharge)
    .bind(session_type)
    .bind(session_report)
    .bind(feedback)
    .bind(next_recommend)
    .bind(progress_link)
    .fetch_one(pool)
    .await?;

    Ok(updated)
}
