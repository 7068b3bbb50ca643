use crate::models::DbAppointment;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

/// Takes a row lock on the employee so concurrent bookings for the same
/// employee run one after another. Returns `false` if the employee is gone.
pub async fn lock_employee(conn: &mut PgConnection, employee_id: Uuid) -> Result<bool> {
    let locked = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM employees
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(employee_id)
    .fetch_optional(conn)
    .await?;

    Ok(locked.is_some())
}

pub async fn get_active_appointments_for_day(
    conn: &mut PgConnection,
    employee_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, employee_id, service_id, customer_id, appointment_date,
               start_time, duration_minutes, status, notes, created_at
        FROM appointments
        WHERE employee_id = $1
          AND appointment_date = $2
          AND status <> 'cancelled'
        ORDER BY start_time ASC
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .fetch_all(conn)
    .await?;

    Ok(appointments)
}

pub struct InsertAppointment<'a> {
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub notes: Option<&'a str>,
}

pub async fn insert_appointment(
    conn: &mut PgConnection,
    appointment: InsertAppointment<'_>,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let created = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, employee_id, service_id, customer_id, appointment_date,
                                  start_time, duration_minutes, status, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $9)
        RETURNING id, employee_id, service_id, customer_id, appointment_date,
                  start_time, duration_minutes, status, notes, created_at
        "#,
    )
    .bind(id)
    .bind(appointment.employee_id)
    .bind(appointment.service_id)
    .bind(appointment.customer_id)
    .bind(appointment.date)
    .bind(appointment.start_time)
    .bind(appointment.duration_minutes)
    .bind(appointment.notes)
    .bind(now)
    .fetch_one(conn)
    .await?;

    tracing::debug!("Appointment created: id={}", id);
    Ok(created)
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, employee_id, service_id, customer_id, appointment_date,
               start_time, duration_minutes, status, notes, created_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn cancel_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = 'cancelled'
        WHERE id = $1
        RETURNING id, employee_id, service_id, customer_id, appointment_date,
                  start_time, duration_minutes, status, notes, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}
