//! Service layer for Session Controller.
//!
//! # Components
//!
//! - `auth` - credential verification against the user directory
//! - `media_client` - media gateway trait, HTTP client and test mock
//! - `orchestrator` - session lifecycle and membership state machine

pub mod auth;
pub mod media_client;
pub mod orchestrator;

pub use auth::AuthService;
pub use media_client::{MediaClient, MediaGateway, MediaToken};
pub use orchestrator::{JoinTicket, SessionOrchestrator};
