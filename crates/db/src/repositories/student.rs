use crate::models::DbStudent;
use argon2::{Argon2, PasswordVerifier};
use chrono::Utc;
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};

#[allow(clippy::too_many_arguments)]
pub async fn create_student(
    pool: &Pool<Postgres>,
    coder_id: &str,
    nickname: &str,
    fullname: &str,
    status: &str,
    course: &str,
    course_status: &str,
    program: Option<&str>,
    parent_password_hash: &str,
) -> Result<DbStudent> {
    let now = Utc::now();

    tracing::debug!("Creating student: coder_id={}, nickname={}", coder_id, nickname);

    let student = sqlx::query_as::<_, DbStudent>(
        r#"
        INSERT INTO students
            (coder_id, nickname, fullname, status, course, course_status,
             program, parent_password_hash, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING coder_id, nickname, fullname, status, course, course_status,
                  program, parent_password_hash, project_list_url, created_at
        "#,
    )
    .bind(coder_id)
    .bind(nickname)
    .bind(fullname)
    .bind(status)
    .bind(course)
    .bind(course_status)
    .bind(program)
    .bind(parent_password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(student)
}

pub async fn get_student_by_coder_id(
    pool: &Pool<Postgres>,
    coder_id: &str,
) -> Result<Option<DbStudent>> {
    let student = sqlx::query_as::<_, DbStudent>(
        r#"
        SELECT coder_id, nickname, fullname, status, course, course_status,
               program, parent_password_hash, project_list_url, created_at
        FROM students
        WHERE coder_id = $1
        "#,
    )
    .bind(coder_id)
    .fetch_optional(pool)
    .await?;

    Ok(student)
}

pub async fn list_students(pool: &Pool<Postgres>) -> Result<Vec<DbStudent>> {
    let students = sqlx::query_as::<_, DbStudent>(
        r#"
        SELECT coder_id, nickname, fullname, status, course, course_status,
               program, parent_password_hash, project_list_url, created_at
        FROM students
        ORDER BY coder_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(students)
}

pub async fn update_parent_password(
    pool: &Pool<Postgres>,
    coder_id: &str,
    new_password_hash: &str,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET parent_password_hash = $2
        WHERE coder_id = $1
        "#,
    )
    .bind(coder_id)
    .bind(new_password_hash)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(eyre!("Student not found: {}", coder_id));
    }
    Ok(())
}

pub async fn update_project_list_url(
    pool: &Pool<Postgres>,
    coder_id: &str,
    project_list_url: &str,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET project_list_url = $2
        WHERE coder_id = $1
        "#,
    )
    .bind(coder_id)
    .bind(project_list_url)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(eyre!("Student not found: {}", coder_id));
    }
    Ok(())
}

pub async fn verify_parent_password(
    pool: &Pool<Postgres>,
    coder_id: &str,
    password: &str,
) -> Result<bool> {
    let student = get_student_by_coder_id(pool, coder_id)
        .await?
        .ok_or_else(|| eyre!("Student not found: {}", coder_id))?;

    let parsed_hash = argon2::PasswordHash::new(&student.parent_password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(is_valid)
}
