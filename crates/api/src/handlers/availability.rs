//! # Availability Handlers
//!
//! Serves the bookable start times for one employee, one service and one date.
//!
//! ## Flow
//!
//! 1. Validate the query and make sure the employee exists
//! 2. Resolve the service duration, falling back according to the configured
//!    [`UnknownServicePolicy`] when the service is missing, unknown or inactive
//! 3. Look up the employee's working hours for the date's weekday; no active
//!    schedule means no slots
//! 4. Load the day's non-cancelled appointments as busy intervals
//! 5. Run the slot finder and return the result

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use slotbook_core::{
    errors::{BookingError, BookingResult},
    models::availability::AvailabilityResponse,
    slots::{AvailableSlot, ServiceDuration},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{config::UnknownServicePolicy, middleware::error_handling::AppError, ApiState};

/// Query parameters for the availability endpoint
///
/// # Fields
///
/// * `employee_id` - Employee whose calendar is searched (required)
/// * `service_id` - Service to be booked; decides the slot length
/// * `date` - Calendar day in `YYYY-MM-DD` form (required)
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub employee_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

/// Lists the start times still free for a service with an employee on a date
///
/// # Endpoint
///
/// ```text
/// GET /api/availability?employee_id=<uuid>&service_id=<uuid>&date=2024-05-06
/// ```
///
/// # Errors
///
/// * `BookingError::Validation` - `employee_id` or `date` missing, or the
///   service has a non-positive duration
/// * `BookingError::NotFound` - Unknown employee, or unknown or inactive
///   service when the policy is `reject`
/// * `BookingError::Database` - Store failure
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let employee_id = query
        .employee_id
        .ok_or_else(|| BookingError::Validation("employee_id is required".to_string()))?;
    let date = query
        .date
        .ok_or_else(|| BookingError::Validation("date is required".to_string()))?;

    state
        .store
        .get_employee(employee_id)
        .await?
        .filter(|employee| employee.is_active)
        .ok_or_else(|| {
            BookingError::NotFound(format!("Employee with ID {} not found", employee_id))
        })?;

    let duration = resolve_duration(&state, query.service_id).await?;
    let slots = slots_for_day(&state, employee_id, date, duration).await?;

    tracing::debug!(
        "Availability: employee_id={}, date={}, duration={}, slots={}",
        employee_id,
        date,
        duration.minutes(),
        slots.len()
    );

    Ok(Json(AvailabilityResponse {
        employee_id,
        service_id: query.service_id,
        date,
        duration_minutes: duration.minutes(),
        slots,
    }))
}

async fn resolve_duration(
    state: &ApiState,
    service_id: Option<Uuid>,
) -> BookingResult<ServiceDuration> {
    let service = match service_id {
        Some(id) => state
            .store
            .get_service(id)
            .await?
            .filter(|service| service.is_active),
        None => None,
    };

    match (service, state.unknown_service_policy) {
        (Some(service), _) => service.duration(),
        (None, UnknownServicePolicy::DefaultDuration(fallback)) => {
            tracing::warn!(
                "Service {:?} not found, assuming {} minutes",
                service_id,
                fallback.minutes()
            );
            Ok(fallback)
        }
        (None, UnknownServicePolicy::Reject) => Err(match service_id {
            Some(id) => BookingError::NotFound(format!("Service with ID {} not found", id)),
            None => BookingError::Validation("service_id is required".to_string()),
        }),
    }
}

/// Free grid slots for `employee_id` on `date`, for a service of `duration`.
///
/// Returns an empty list when the employee does not work that weekday.
pub(crate) async fn slots_for_day(
    state: &ApiState,
    employee_id: Uuid,
    date: NaiveDate,
    duration: ServiceDuration,
) -> BookingResult<Vec<AvailableSlot>> {
    let Some(schedule) = state
        .store
        .get_employee_schedule(employee_id, date.weekday())
        .await?
    else {
        tracing::debug!(
            "No schedule for employee_id={} on {:?}",
            employee_id,
            date.weekday()
        );
        return Ok(Vec::new());
    };

    let busy = state.store.get_busy_intervals(employee_id, date).await?;

    Ok(state.slot_finder.find_available_slots(
        &schedule.work,
        schedule.brk.as_ref(),
        duration,
        &busy,
    ))
}
