use axum::{extract::State, Json};
use slotbook_core::models::catalog::{
    EmployeeResponse, ListEmployeesResponse, ListServicesResponse, ServiceResponse,
};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ListServicesResponse>, AppError> {
    let services = state.store.list_services().await?;

    Ok(Json(ListServicesResponse {
        services: services.into_iter().map(ServiceResponse::from).collect(),
    }))
}

#[axum::debug_handler]
pub async fn list_employees(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ListEmployeesResponse>, AppError> {
    let employees = state.store.list_employees().await?;

    Ok(Json(ListEmployeesResponse {
        employees: employees.into_iter().map(EmployeeResponse::from).collect(),
    }))
}
