//! # API Configuration Module
//!
//! Loads server and engine settings from environment variables, with defaults
//! for everything except what has no sensible default.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string. When unset the server keeps
//!   everything in memory.
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `DEFAULT_TIMEZONE`: Timezone for providers without a profile (default: "UTC")
//! - `STATUS_HORIZON_DAYS`: How far ahead status looks for a free window (default: 14)
//! - `MAX_RANGE_DAYS`: Longest date range a query may span (default: 92)
//! - `AVAILABILITY_CACHE`: Cache resolved windows, "true" or "false" (default: true)

use std::env;
use std::str::FromStr;

use eyre::{Result, WrapErr};
use slotkeeper_core::{models::provider::parse_timezone, EngineConfig};
use tracing::Level;

/// Configuration for the Slotkeeper API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use slotkeeper_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL connection string, if persistence is wanted
    pub database_url: Option<String>,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Settings handed to the availability engine
    pub engine: EngineConfig,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// Fails when a numeric variable does not parse or `DEFAULT_TIMEZONE`
    /// names an unknown zone.
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("API_PORT", 3000).wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        // Logging settings
        let log_level = match env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = parse_var("API_REQUEST_TIMEOUT_SECONDS", 30).unwrap_or(30);

        // Engine settings
        let defaults = EngineConfig::default();
        let default_timezone = match env::var("DEFAULT_TIMEZONE") {
            Ok(name) => parse_timezone(&name).wrap_err("Invalid DEFAULT_TIMEZONE value")?,
            Err(_) => defaults.default_timezone,
        };
        let engine = EngineConfig {
            default_timezone,
            status_horizon_days: parse_var("STATUS_HORIZON_DAYS", defaults.status_horizon_days)
                .wrap_err("Invalid STATUS_HORIZON_DAYS value")?,
            max_range_days: parse_var("MAX_RANGE_DAYS", defaults.max_range_days)
                .wrap_err("Invalid MAX_RANGE_DAYS value")?,
            cache_enabled: parse_var("AVAILABILITY_CACHE", defaults.cache_enabled)
                .wrap_err("Invalid AVAILABILITY_CACHE value")?,
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            engine,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => Ok(raw.trim().parse()?),
        Err(_) => Ok(default),
    }
}
