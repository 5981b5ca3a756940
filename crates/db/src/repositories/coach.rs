use crate::models::DbCoach;
use argon2::{Argon2, PasswordVerifier};
use chrono::Utc;
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_coach(
    pool: &Pool<Postgres>,
    name: &str,
    password_hash: &str,
) -> Result<DbCoach> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let coach = sqlx::query_as::<_, DbCoach>(
        r#"
        INSERT INTO coaches (id, name, password_hash, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, password_hash, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(coach)
}

pub async fn get_coach_by_name(pool: &Pool<Postgres>, name: &str) -> Result<Option<DbCoach>> {
    let coach = sqlx::query_as::<_, DbCoach>(
        r#"
        SELECT id, name, password_hash, created_at
        FROM coaches
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(coach)
}

pub async fn verify_coach_password(
    pool: &Pool<Postgres>,
    name: &str,
    password: &str,
) -> Result<bool> {
    let coach = get_coach_by_name(pool, name)
        .await?
        .ok_or_else(|| eyre!("Coach not found: {}", name))?;

    let parsed_hash = argon2::PasswordHash::new(&coach.password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(is_valid)
}
