//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GROVE_DATA_DIR` - Directory holding the JSON documents (default: ./data)
//! - `GROVE_HOST` - Bind address (default: 127.0.0.1)
//! - `GROVE_PORT` - Listen port (default: 4000)
//! - `GROVE_JWT_SECRET` - Token signing secret (min 32 chars). Falls back to
//!   an insecure built-in value with a loud warning.
//! - `GROVE_PAYMENT_SECRET` - Payment provider secret key. Payment intents
//!   are disabled when unset.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Development-only signing secret used when `GROVE_JWT_SECRET` is unset.
const INSECURE_DEFAULT_SECRET: &str = "grove-dev-only-signing-secret-do-not-deploy";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding the JSON documents
    pub data_dir: PathBuf,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Payment provider secret key, if payments are enabled
    pub payment_secret: Option<SecretString>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse or a provided
    /// secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("GROVE_DATA_DIR", "./data"));
        let host = get_env_or_default("GROVE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GROVE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("GROVE_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GROVE_PORT".to_string(), e.to_string()))?;

        let jwt_secret = match get_optional_env("GROVE_JWT_SECRET") {
            Some(value) => {
                validate_jwt_secret(&value, "GROVE_JWT_SECRET")?;
                SecretString::from(value)
            }
            None => {
                tracing::warn!(
                    "GROVE_JWT_SECRET is not set, using an insecure built-in secret; \
                     tokens signed with it are forgeable"
                );
                SecretString::from(INSECURE_DEFAULT_SECRET)
            }
        };

        let payment_secret = get_optional_env("GROVE_PAYMENT_SECRET").map(SecretString::from);

        Ok(Self {
            data_dir,
            host,
            port,
            jwt_secret,
            payment_secret,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a provided signing secret meets minimum length requirements.
fn validate_jwt_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                secret.len()
            ),
        ));
    }
    Ok(())
}
