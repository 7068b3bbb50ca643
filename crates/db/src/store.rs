//! # Booking Store
//!
//! The repository boundary used by the API. Handlers depend on the
//! [`BookingStore`] trait only, so tests can substitute [`MockBookingStore`]
//! while production uses [`PgBookingStore`].

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use eyre::Report;
use mockall::automock;
use slotbook_core::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{Appointment, Customer, NewAppointment},
        catalog::{Employee, Service},
        schedule::EmployeeSchedule,
    },
    slots::{BusyInterval, ServiceDuration},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{DbAppointment, weekday_index};
use crate::repositories::{appointment, catalog, customer, schedule};

#[automock]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Active services ordered by name.
    async fn list_services(&self) -> BookingResult<Vec<Service>>;

    async fn get_service(&self, id: Uuid) -> BookingResult<Option<Service>>;

    /// Active employees ordered by name.
    async fn list_employees(&self) -> BookingResult<Vec<Employee>>;

    async fn get_employee(&self, id: Uuid) -> BookingResult<Option<Employee>>;

    /// The employee's active working hours for `weekday`, if any.
    async fn get_employee_schedule(
        &self,
        employee_id: Uuid,
        weekday: Weekday,
    ) -> BookingResult<Option<EmployeeSchedule>>;

    /// Intervals taken by non-cancelled appointments on `date`.
    async fn get_busy_intervals(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> BookingResult<Vec<BusyInterval>>;

    /// Persists a new appointment, registering the customer by email if they
    /// are not known yet. Fails with [`BookingError::Conflict`] if it overlaps
    /// a live appointment of the same employee; nothing is written then.
    async fn create_appointment(&self, appointment: NewAppointment) -> BookingResult<Appointment>;

    async fn get_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>>;

    /// Marks the appointment cancelled, freeing its slot.
    async fn cancel_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>>;
}

/// PostgreSQL-backed [`BookingStore`].
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_appointment(row: DbAppointment) -> BookingResult<Appointment> {
    Ok(Appointment::try_from(row)?)
}

fn to_busy_intervals(rows: Vec<DbAppointment>) -> BookingResult<Vec<BusyInterval>> {
    rows.into_iter()
        .map(|row| to_appointment(row).map(|a| a.busy_interval()))
        .collect()
}

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

fn employee_not_found(employee_id: Uuid) -> BookingError {
    BookingError::NotFound(format!("Employee with ID {} not found", employee_id))
}

/// Checks a booking against the live appointments of its day.
fn check_slot_free(
    busy: &[BusyInterval],
    new: &NewAppointment,
    duration: ServiceDuration,
) -> BookingResult<()> {
    let end = new.start_time.seconds_from_midnight() + i64::from(duration.minutes()) * 60;
    if end > SECONDS_PER_DAY {
        return Err(BookingError::Validation(format!(
            "Appointment at {} for {} minutes runs past midnight",
            new.start_time.display(),
            duration.minutes()
        )));
    }

    if busy.iter().any(|b| b.overlaps(new.start_time, duration)) {
        return Err(slot_taken(new));
    }

    Ok(())
}

/// A unique violation on insert means a concurrent booking took the slot.
fn insert_error(err: Report, new: &NewAppointment) -> BookingError {
    if is_unique_violation(&err) {
        slot_taken(new)
    } else {
        BookingError::Database(err)
    }
}

fn is_unique_violation(err: &Report) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}

fn slot_taken(appointment: &NewAppointment) -> BookingError {
    BookingError::Conflict(format!(
        "Time {} on {} is no longer available",
        appointment.start_time.display(),
        appointment.date
    ))
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn list_services(&self) -> BookingResult<Vec<Service>> {
        let rows = catalog::list_active_services(&self.pool).await?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn get_service(&self, id: Uuid) -> BookingResult<Option<Service>> {
        let row = catalog::get_service_by_id(&self.pool, id).await?;
        Ok(row.map(Service::from))
    }

    async fn list_employees(&self) -> BookingResult<Vec<Employee>> {
        let rows = catalog::list_active_employees(&self.pool).await?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn get_employee(&self, id: Uuid) -> BookingResult<Option<Employee>> {
        let row = catalog::get_employee_by_id(&self.pool, id).await?;
        Ok(row.map(Employee::from))
    }

    async fn get_employee_schedule(
        &self,
        employee_id: Uuid,
        weekday: Weekday,
    ) -> BookingResult<Option<EmployeeSchedule>> {
        let row =
            schedule::get_active_schedule_for_day(&self.pool, employee_id, weekday_index(weekday))
                .await?;

        match row {
            Some(row) => Ok(Some(EmployeeSchedule::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn get_busy_intervals(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> BookingResult<Vec<BusyInterval>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        let rows = appointment::get_active_appointments_for_day(&mut conn, employee_id, date).await?;
        to_busy_intervals(rows)
    }

    async fn create_appointment(&self, new: NewAppointment) -> BookingResult<Appointment> {
        tracing::debug!(
            "Booking appointment: employee_id={}, date={}, start={}",
            new.employee_id,
            new.date,
            new.start_time
        );

        let duration = ServiceDuration::new(i64::from(new.duration_minutes))?;
        let duration_minutes = i32::try_from(new.duration_minutes).map_err(|_| {
            BookingError::Validation(format!(
                "Duration of {} minutes is too long",
                new.duration_minutes
            ))
        })?;

        let mut tx = self.pool.begin().await.map_err(Report::from)?;

        if !appointment::lock_employee(&mut tx, new.employee_id).await? {
            return Err(employee_not_found(new.employee_id));
        }

        // Re-read under the lock; the caller's view of the day may be stale.
        let rows =
            appointment::get_active_appointments_for_day(&mut tx, new.employee_id, new.date).await?;
        let busy = to_busy_intervals(rows)?;
        if let Err(err) = check_slot_free(&busy, &new, duration) {
            tracing::debug!("Slot rejected while booking: employee_id={}", new.employee_id);
            return Err(err);
        }

        let customer = Customer::from(
            customer::find_or_create_customer(
                &mut tx,
                &new.customer.name,
                &new.customer.email,
                new.customer.phone.as_deref(),
            )
            .await?,
        );

        let insert = appointment::InsertAppointment {
            employee_id: new.employee_id,
            service_id: new.service_id,
            customer_id: customer.id,
            date: new.date,
            start_time: new.start_time.as_naive(),
            duration_minutes,
            notes: new.notes.as_deref(),
        };

        let row = appointment::insert_appointment(&mut tx, insert)
            .await
            .map_err(|err| insert_error(err, &new))?;

        tx.commit().await.map_err(Report::from)?;
        to_appointment(row)
    }

    async fn get_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        appointment::get_appointment_by_id(&self.pool, id)
            .await?
            .map(to_appointment)
            .transpose()
    }

    async fn cancel_appointment(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        let row = appointment::cancel_appointment(&self.pool, id).await?;
        if row.is_some() {
            tracing::info!("Appointment cancelled: id={}", id);
        }
        row.map(to_appointment).transpose()
    }
}
