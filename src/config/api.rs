//! API endpoint configuration from environment variables.
//!
//! The back-office server location is deployment-specific, so it comes from
//! the environment (a `.env` file loaded via `dotenvy` or externally-set
//! variables) with a local default for development.

use crate::errors::{Error, Result};

/// Default server location for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the [`crate::api::ApiClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the back-office server, with a trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Reads `API_BASE_URL` and `API_TIMEOUT_SECS` from the environment,
    /// falling back to the local-development defaults.
    ///
    /// # Errors
    /// Returns a `Config` error when `API_TIMEOUT_SECS` is set but not a
    /// positive integer.
    pub fn from_env() -> Result<Self> {
        // Non-fatal: env vars can be set externally
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match std::env::var("API_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| Error::Config {
                message: format!("Invalid API_TIMEOUT_SECS value '{raw}': {e}"),
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(Error::Config {
                message: "API_TIMEOUT_SECS must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }
}
