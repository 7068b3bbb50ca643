use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            duration_minutes INTEGER NOT NULL DEFAULT 60,
            price_cents BIGINT NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_minutes > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create employees table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            phone VARCHAR(50) NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create employee_schedules table, one row per employee and weekday
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employee_schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            employee_id UUID NOT NULL REFERENCES employees(id),
            day_of_week SMALLINT NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            break_start TIME NULL,
            break_end TIME NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6),
            CONSTRAINT valid_work_window CHECK (end_time > start_time),
            CONSTRAINT valid_break_window CHECK (
                break_start IS NULL OR break_end IS NULL OR (
                    break_start >= start_time
                    AND break_end > break_start
                    AND break_end <= end_time
                )
            ),
            CONSTRAINT one_schedule_per_day UNIQUE (employee_id, day_of_week)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create customers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            phone VARCHAR(50) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            employee_id UUID NOT NULL REFERENCES employees(id),
            service_id UUID NOT NULL REFERENCES services(id),
            customer_id UUID NOT NULL REFERENCES customers(id),
            appointment_date DATE NOT NULL,
            start_time TIME NOT NULL,
            duration_minutes INTEGER NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_appointment_duration CHECK (duration_minutes > 0),
            CONSTRAINT valid_status CHECK (
                status IN ('pending', 'confirmed', 'completed', 'cancelled')
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Two live bookings can never share an employee, date and start time
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uq_appointments_active_slot
        ON appointments(employee_id, appointment_date, start_time)
        WHERE status <> 'cancelled';
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_employee_schedules_employee_id ON employee_schedules(employee_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_employee_date ON appointments(employee_id, appointment_date)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_customer_id ON appointments(customer_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
