//! Server configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary calls `dotenvy::dotenv()` first, so a `.env` file works too.

use seatline_reservation::{DirectoryParseError, ReservationConfig, StaticDirectory};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Reservation engine settings
    pub reservation: ReservationConfig,
    /// Static directory entries, `token:id:role` comma separated
    pub callers: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// How long in-flight requests get to drain on shutdown
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = ServerConfig::default();
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or(defaults.host),
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.port),
                shutdown_timeout: env::var("SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.shutdown_timeout),
            },
            reservation: ReservationConfig::from_env(),
            callers: env::var("SEATLINE_CALLERS").unwrap_or_default(),
        }
    }

    /// Builds the static directory from [`Config::callers`].
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryParseError`] for a malformed entry.
    pub fn directory(&self) -> Result<StaticDirectory, DirectoryParseError> {
        StaticDirectory::parse(&self.callers)
    }
}
