//! Session Controller configuration.
//!
//! Configuration is loaded from environment variables. The gateway secret
//! is held in a [`SecretString`] so Debug output is redacted.

use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default media gateway API username.
pub const DEFAULT_GATEWAY_USER: &str = "OPENVIDUAPP";

/// Default media gateway request timeout in seconds.
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

/// Session Controller configuration.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the media gateway (e.g., "https://openvidu-server:8443").
    pub gateway_url: String,

    /// HTTP basic auth username for the media gateway API.
    pub gateway_username: String,

    /// HTTP basic auth secret for the media gateway API.
    /// Protected by `SecretString` to prevent accidental logging.
    pub gateway_password: SecretString,

    /// Accept self-signed gateway TLS certificates (default: false).
    /// Media servers in private deployments commonly terminate TLS with
    /// a self-signed certificate.
    pub accept_invalid_certs: bool,

    /// Media gateway request timeout in seconds (default: 10).
    pub request_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid boolean value for {0}")]
    InvalidFlag(String),

    #[error("Invalid timeout configuration: {0}")]
    InvalidTimeout(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let gateway_url = vars
            .get("MEDIA_GATEWAY_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("MEDIA_GATEWAY_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let gateway_username = vars
            .get("MEDIA_GATEWAY_USER")
            .cloned()
            .unwrap_or_else(|| DEFAULT_GATEWAY_USER.to_string());

        let gateway_password = vars
            .get("MEDIA_GATEWAY_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("MEDIA_GATEWAY_SECRET".to_string()))
            .map(|s| SecretString::from(s.clone()))?;

        let accept_invalid_certs = match vars.get("MEDIA_GATEWAY_INSECURE_TLS") {
            None => false,
            Some(raw) => raw
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidFlag("MEDIA_GATEWAY_INSECURE_TLS".to_string()))?,
        };

        let request_timeout_secs = match vars.get("MEDIA_GATEWAY_TIMEOUT_SECS") {
            None => DEFAULT_GATEWAY_TIMEOUT_SECS,
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidTimeout(e.to_string()))?;
                if secs == 0 {
                    return Err(ConfigError::InvalidTimeout(
                        "timeout must be greater than zero".to_string(),
                    ));
                }
                secs
            }
        };

        Ok(Self {
            gateway_url,
            gateway_username,
            gateway_password,
            accept_invalid_certs,
            request_timeout_secs,
        })
    }
}
