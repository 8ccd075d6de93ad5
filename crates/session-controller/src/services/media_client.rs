//! Media gateway client.
//!
//! The media gateway allocates session identifiers and issues access
//! tokens for actual media transport. The orchestrator consumes it through
//! the [`MediaGateway`] trait so tests can substitute a mock; the real
//! implementation is an HTTP client speaking the gateway's REST API with
//! basic auth.

use crate::config::Config;
use crate::errors::ScError;
use crate::models::UserRole;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, instrument, warn};

/// Connect timeout for gateway requests in seconds.
const GATEWAY_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Access token issued by the media gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaToken {
    /// The media session the token is bound to.
    #[serde(rename = "session")]
    pub session_id: String,

    /// Opaque token the client presents to the media server.
    pub token: String,
}

/// Token request body for the gateway's token endpoint.
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    session: &'a str,
    role: &'a str,
    data: &'a str,
}

/// Media gateway operations (enables mocking).
#[async_trait::async_trait]
pub trait MediaGateway: Send + Sync {
    /// Allocate a new media session and return its external identifier.
    async fn create_media_session(&self) -> Result<String, ScError>;

    /// Issue an access token for `session_id` with the given role and
    /// participant metadata.
    async fn issue_token(
        &self,
        session_id: &str,
        role: UserRole,
        metadata: &str,
    ) -> Result<MediaToken, ScError>;
}

/// HTTP client for the media gateway REST API.
#[derive(Debug, Clone)]
pub struct MediaClient {
    /// HTTP client with configured timeouts.
    client: Client,

    /// Base URL of the gateway.
    base_url: String,

    /// Basic auth username.
    username: String,

    /// Basic auth secret.
    password: SecretString,
}

impl MediaClient {
    /// Create a new media gateway client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ScError::Gateway` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ScError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(GATEWAY_CONNECT_TIMEOUT_SECS))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| {
                error!(target: "sc.services.media_client", error = %e, "Failed to build HTTP client");
                ScError::Gateway(e.to_string())
            })?;

        Ok(Self {
            client,
            base_url: config.gateway_url.clone(),
            username: config.gateway_username.clone(),
            password: config.gateway_password.clone(),
        })
    }
}

#[async_trait::async_trait]
impl MediaGateway for MediaClient {
    #[instrument(skip(self))]
    async fn create_media_session(&self) -> Result<String, ScError> {
        let url = format!("{}/api/sessions", self.base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await
            .map_err(|e| {
                warn!(target: "sc.services.media_client", error = %e, "Gateway request failed");
                ScError::Gateway(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                target: "sc.services.media_client",
                status = %status,
                "Gateway rejected session creation"
            );
            return Err(ScError::Gateway(format!("gateway returned {status}")));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            error!(target: "sc.services.media_client", error = %e, "Failed to parse gateway response");
            ScError::Gateway(e.to_string())
        })?;

        match body.get("id").and_then(serde_json::Value::as_str) {
            Some(id) => Ok(id.to_string()),
            None => Err(ScError::Gateway(
                "gateway response contains no session id".to_string(),
            )),
        }
    }

    #[instrument(skip(self, metadata), fields(session_id = %session_id, role = %role))]
    async fn issue_token(
        &self,
        session_id: &str,
        role: UserRole,
        metadata: &str,
    ) -> Result<MediaToken, ScError> {
        let url = format!("{}/api/tokens", self.base_url);
        let request = TokenRequest {
            session: session_id,
            role: role.as_str(),
            data: metadata,
        };

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "sc.services.media_client", error = %e, "Gateway request failed");
                ScError::Gateway(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                target: "sc.services.media_client",
                status = %status,
                "Gateway rejected token request"
            );
            return Err(ScError::Gateway(format!("gateway returned {status}")));
        }

        response.json().await.map_err(|e| {
            error!(target: "sc.services.media_client", error = %e, "Failed to parse gateway response");
            ScError::Gateway(e.to_string())
        })
    }
}

/// Mock media gateway for testing.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock gateway that serves scripted session identifiers and
    /// deterministic tokens.
    pub struct MockMediaGateway {
        /// Session identifiers to hand out (cycles through them).
        session_ids: Vec<String>,
        /// Number of session allocations requested.
        session_calls: AtomicUsize,
        /// Number of tokens issued.
        token_calls: AtomicUsize,
        /// Whether to fail every call.
        return_error: bool,
    }

    impl MockMediaGateway {
        /// Create a mock that always allocates `session_id`.
        pub fn issuing(session_id: &str) -> Self {
            Self {
                session_ids: vec![session_id.to_string()],
                session_calls: AtomicUsize::new(0),
                token_calls: AtomicUsize::new(0),
                return_error: false,
            }
        }

        /// Create a mock that hands out `session_ids` in sequence.
        pub fn with_session_ids(session_ids: Vec<String>) -> Self {
            Self {
                session_ids,
                session_calls: AtomicUsize::new(0),
                token_calls: AtomicUsize::new(0),
                return_error: false,
            }
        }

        /// Create a mock where every call fails.
        pub fn failing() -> Self {
            Self {
                session_ids: vec![],
                session_calls: AtomicUsize::new(0),
                token_calls: AtomicUsize::new(0),
                return_error: true,
            }
        }

        /// Number of session allocations requested so far.
        pub fn session_calls(&self) -> usize {
            self.session_calls.load(Ordering::SeqCst)
        }

        /// Number of tokens issued so far.
        pub fn token_calls(&self) -> usize {
            self.token_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl MediaGateway for MockMediaGateway {
        async fn create_media_session(&self) -> Result<String, ScError> {
            let count = self.session_calls.fetch_add(1, Ordering::SeqCst);

            if self.return_error {
                return Err(ScError::Gateway("mock gateway error".to_string()));
            }

            if self.session_ids.is_empty() {
                return Ok(format!("mock-session-{count}"));
            }

            let idx = count % self.session_ids.len();
            self.session_ids
                .get(idx)
                .cloned()
                .ok_or_else(|| ScError::Gateway("mock gateway error".to_string()))
        }

        async fn issue_token(
            &self,
            session_id: &str,
            role: UserRole,
            _metadata: &str,
        ) -> Result<MediaToken, ScError> {
            let count = self.token_calls.fetch_add(1, Ordering::SeqCst);

            if self.return_error {
                return Err(ScError::Gateway("mock gateway error".to_string()));
            }

            Ok(MediaToken {
                session_id: session_id.to_string(),
                token: format!("tok-{}-{}-{count}", session_id, role.as_str()),
            })
        }
    }
}
