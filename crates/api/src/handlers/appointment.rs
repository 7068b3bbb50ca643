use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use slotbook_core::{
    errors::BookingError,
    models::appointment::{
        AppointmentResponse, CreateAppointmentRequest, CustomerDetails, NewAppointment,
        NewCustomer,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{handlers::availability::slots_for_day, middleware::error_handling::AppError, ApiState};

fn validate_customer(details: &CustomerDetails) -> Result<NewCustomer, BookingError> {
    let name = details.name.trim();
    if name.is_empty() {
        return Err(BookingError::Validation("Customer name is required".to_string()));
    }

    let email = details.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(BookingError::Validation(format!(
            "Invalid customer email: {}",
            details.email
        )));
    }

    let phone = details
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    Ok(NewCustomer {
        name: name.to_string(),
        email,
        phone,
    })
}

/// Books a slot previously offered by the availability endpoint
///
/// The requested start time must be one of the slots the availability search
/// would return right now; the store re-checks for overlaps under a lock
/// before inserting, so two customers racing for the same slot cannot both
/// win.
///
/// # Errors
///
/// * `BookingError::Validation` - Blank name or malformed email
/// * `BookingError::NotFound` - Unknown or inactive employee or service
/// * `BookingError::Conflict` - The start time is not (or no longer) free
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let customer = validate_customer(&payload.customer)?;

    state
        .store
        .get_employee(payload.employee_id)
        .await?
        .filter(|employee| employee.is_active)
        .ok_or_else(|| {
            BookingError::NotFound(format!(
                "Employee with ID {} not found",
                payload.employee_id
            ))
        })?;

    let service = state
        .store
        .get_service(payload.service_id)
        .await?
        .filter(|service| service.is_active)
        .ok_or_else(|| {
            BookingError::NotFound(format!("Service with ID {} not found", payload.service_id))
        })?;
    let duration = service.duration()?;

    let slots = slots_for_day(&state, payload.employee_id, payload.date, duration).await?;
    if !slots.iter().any(|slot| slot.time == payload.start_time) {
        return Err(AppError(BookingError::Conflict(format!(
            "Time {} on {} is not available",
            payload.start_time.display(),
            payload.date
        ))));
    }

    let appointment = state
        .store
        .create_appointment(NewAppointment {
            employee_id: payload.employee_id,
            service_id: service.id,
            customer,
            date: payload.date,
            start_time: payload.start_time,
            duration_minutes: duration.minutes(),
            notes: payload.notes,
        })
        .await?;

    tracing::info!(
        "Appointment booked: id={}, employee_id={}, date={}, start={}",
        appointment.id,
        appointment.employee_id,
        appointment.date,
        appointment.start_time
    );

    Ok((StatusCode::CREATED, Json(AppointmentResponse::from(appointment))))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state
        .store
        .get_appointment(id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state
        .store
        .cancel_appointment(id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;

    Ok(Json(AppointmentResponse::from(appointment)))
}
