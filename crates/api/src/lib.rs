//! # Slotbook API
//!
//! The API crate provides the web server for the Slotbook appointment booking
//! service. It exposes endpoints for browsing services and employees, finding
//! free appointment slots, and booking or cancelling appointments.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like error handling
//! - **Config**: Handle environment and application configuration
//!
//! Handlers talk to persistence only through the `BookingStore` trait, so the
//! server runs against PostgreSQL while tests run against a mock.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{http::HeaderValue, Router};
use eyre::{Result, WrapErr};
use slotbook_core::slots::SlotFinder;
use slotbook_db::{BookingStore, PgBookingStore};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::config::{ApiConfig, UnknownServicePolicy};

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(ApiState::new(Arc::new(PgBookingStore::new(pool)), &config)?);
/// let app = build_router(state);
/// ```
pub struct ApiState {
    /// Persistence boundary for services, schedules and appointments
    pub store: Arc<dyn BookingStore>,
    /// Slot search configured with the grid step
    pub slot_finder: SlotFinder,
    /// Fallback used when an availability request names an unknown service
    pub unknown_service_policy: UnknownServicePolicy,
}

impl ApiState {
    pub fn new(store: Arc<dyn BookingStore>, config: &ApiConfig) -> Result<Self> {
        let slot_finder = SlotFinder::with_step_minutes(config.slot_interval_minutes)
            .map_err(|e| eyre::eyre!("{}", e))?;

        Ok(Self {
            store,
            slot_finder,
            unknown_service_policy: config.unknown_service_policy,
        })
    }
}

/// Builds the application router with all routes attached to `state`
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Service and employee listings
        .merge(routes::catalog::routes())
        // Slot search
        .merge(routes::availability::routes())
        // Booking and cancellation
        .merge(routes::appointment::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<HeaderValue>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_origin(origins))
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, wires the PostgreSQL booking store into
/// the shared state, configures routes and layers, and serves HTTP until the
/// process is stopped.
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and slot settings
/// * `db_pool` - PostgreSQL connection pool for database operations
pub async fn start_server(config: ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let store: Arc<dyn BookingStore> = Arc::new(PgBookingStore::new(db_pool));
    let state = Arc::new(ApiState::new(store, &config)?);
    info!(
        "Slot interval {} minutes, unknown service policy '{}'",
        state.slot_finder.step_minutes(),
        state.unknown_service_policy
    );

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout and tracing middleware
    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(TraceLayer::new_for_http());

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
