use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create students table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            coder_id VARCHAR(64) PRIMARY KEY,
            nickname VARCHAR(255) NOT NULL,
            fullname VARCHAR(255) NOT NULL,
            status VARCHAR(64) NOT NULL DEFAULT 'Enrolled',
            course VARCHAR(255) NOT NULL DEFAULT '',
            course_status VARCHAR(255) NOT NULL DEFAULT '',
            program VARCHAR(255) NULL,
            parent_password_hash VARCHAR(255) NOT NULL,
            project_list_url TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create coaches table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS coaches (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create reports table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reports (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            coder_id VARCHAR(64) NOT NULL REFERENCES students(coder_id),
            session_date DATE NOT NULL,
            time_slot VARCHAR(32) NULL,
            topic VARCHAR(255) NOT NULL,
            session_incharge VARCHAR(255) NOT NULL,
            session_type VARCHAR(64) NOT NULL DEFAULT '',
            session_report TEXT NOT NULL,
            feedback TEXT NULL,
            next_recommend TEXT NULL,
            progress_link TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            coder_id VARCHAR(64) NOT NULL REFERENCES students(coder_id),
            coach VARCHAR(255) NOT NULL,
            session_date DATE NOT NULL,
            time_slot VARCHAR(32) NOT NULL,
            note TEXT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'confirmed',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create fixed_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fixed_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            coder_id VARCHAR(64) NOT NULL REFERENCES students(coder_id),
            coach VARCHAR(255) NOT NULL,
            weekday SMALLINT NOT NULL CHECK (weekday BETWEEN 0 AND 6),
            time_slot VARCHAR(32) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT uniq_fixed_slot UNIQUE (coder_id, weekday, time_slot)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create absences table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS absences (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            coder_id VARCHAR(64) NOT NULL REFERENCES students(coder_id),
            session_date DATE NOT NULL,
            time_slot VARCHAR(32) NOT NULL,
            reason TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT uniq_absence UNIQUE (coder_id, session_date, time_slot)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // A student may hold at most one live booking per date and time.
    // This closes the duplicate-booking race the old client-side check
    // could not.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_live_booking
            ON bookings (coder_id, session_date, time_slot)
            WHERE status <> 'cancelled';
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_reports_coder_id ON reports(coder_id);",
        "CREATE INDEX IF NOT EXISTS idx_reports_session_date ON reports(session_date);",
        "CREATE INDEX IF NOT EXISTS idx_bookings_coach_date ON bookings(coach, session_date);",
        "CREATE INDEX IF NOT EXISTS idx_bookings_coder_id ON bookings(coder_id);",
        "CREATE INDEX IF NOT EXISTS idx_fixed_slots_coach_weekday ON fixed_slots(coach, weekday);",
        "CREATE INDEX IF NOT EXISTS idx_fixed_slots_coder_id ON fixed_slots(coder_id);",
        "CREATE INDEX IF NOT EXISTS idx_absences_session_date ON absences(session_date);",
        "CREATE INDEX IF NOT EXISTS idx_absences_coder_id ON absences(coder_id);",
    ];
    for stmt in indexes {
        sqlx::query(stmt).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
