use crate::models::DbEmployeeSchedule;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Active schedule row for one employee on one weekday (0 = Sunday).
pub async fn get_active_schedule_for_day(
    pool: &Pool<Postgres>,
    employee_id: Uuid,
    day_of_week: i16,
) -> Result<Option<DbEmployeeSchedule>> {
    tracing::debug!(
        "Getting schedule: employee_id={}, day_of_week={}",
        employee_id, day_of_week
    );

    let schedule = sqlx::query_as::<_, DbEmployeeSchedule>(
        r#"
        SELECT id, employee_id, day_of_week, start_time, end_time,
               break_start, break_end, is_active
        FROM employee_schedules
        WHERE employee_id = $1 AND day_of_week = $2 AND is_active = TRUE
        "#,
    )
    .bind(employee_id)
    .bind(day_of_week)
    .fetch_optional(pool)
    .await?;

    if schedule.is_none() {
        tracing::debug!(
            "No active schedule: employee_id={}, day_of_week={}",
            employee_id, day_of_week
        );
    }

    Ok(schedule)
}
