//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the Slotbook API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `SLOT_INTERVAL_MINUTES`: Grid step for offered start times (default: 30)
//! - `UNKNOWN_SERVICE_POLICY`: `default:<minutes>` or `reject` (default: "default:60")

use std::{env, fmt, str::FromStr};

use eyre::{eyre, Result, WrapErr};
use slotbook_core::slots::{ServiceDuration, DEFAULT_SLOT_INTERVAL_MINUTES};
use tracing::Level;

/// What the availability endpoint does when the requested service is missing
/// or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownServicePolicy {
    /// Compute slots as if the service lasted this long.
    DefaultDuration(ServiceDuration),
    /// Answer with 404.
    Reject,
}

impl Default for UnknownServicePolicy {
    fn default() -> Self {
        Self::DefaultDuration(ServiceDuration::default())
    }
}

impl FromStr for UnknownServicePolicy {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("reject") {
            return Ok(Self::Reject);
        }
        if s.eq_ignore_ascii_case("default") {
            return Ok(Self::default());
        }

        let minutes = s
            .strip_prefix("default:")
            .ok_or_else(|| eyre!("Expected 'reject' or 'default:<minutes>', got '{}'", s))?;
        let minutes: i64 = minutes
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid fallback duration '{}'", minutes))?;
        let duration = ServiceDuration::new(minutes).map_err(|e| eyre!("{}", e))?;

        Ok(Self::DefaultDuration(duration))
    }
}

impl fmt::Display for UnknownServicePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultDuration(duration) => write!(f, "default:{}", duration.minutes()),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// Configuration for the Slotbook API server
///
/// This struct encapsulates all configuration options for the API server,
/// including networking, database connections, and slot search settings.
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use slotbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Grid step, in minutes, between offered start times
    pub slot_interval_minutes: u32,

    /// Behaviour for availability requests naming an unknown service
    pub unknown_service_policy: UnknownServicePolicy,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - SLOT_INTERVAL_MINUTES is not a positive integer
    /// - UNKNOWN_SERVICE_POLICY is malformed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Slot search settings
        let slot_interval_minutes = match lookup("SLOT_INTERVAL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| eyre!("SLOT_INTERVAL_MINUTES must be a positive integer, got '{}'", raw))?,
            None => DEFAULT_SLOT_INTERVAL_MINUTES,
        };

        let unknown_service_policy = match lookup("UNKNOWN_SERVICE_POLICY") {
            Some(raw) => raw.parse().wrap_err("Invalid UNKNOWN_SERVICE_POLICY value")?,
            None => UnknownServicePolicy::default(),
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            slot_interval_minutes,
            unknown_service_policy,
        })
    }

    /// Returns the server address as a string
    ///
    /// # Returns
    ///
    /// * `String` - Formatted server address (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
