//! Session Controller library.
//!
//! Coordinates named conferencing sessions owned by one user with zero or
//! more subscribing participants, backed by an external media server that
//! allocates session identifiers and issues access tokens.
//!
//! # Components
//!
//! - [`repositories::UserDirectory`] - authoritative username -> user record store
//! - [`repositories::SessionRegistry`] - authoritative session name -> session store
//! - [`services::AuthService`] - credential verification against the directory
//! - [`services::SessionOrchestrator`] - join/create/depart/delete state machine
//! - [`services::MediaGateway`] - media server seam (HTTP client + test mock)
//!
//! The HTTP/presentation layer is an embedding concern and lives outside this
//! crate; it drives the request boundary exposed by [`services`].

pub mod config;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;

pub use config::Config;
pub use errors::ScError;
pub use models::{Session, User, UserRole};
pub use repositories::{SessionRegistry, UserDirectory};
pub use services::{
    AuthService, JoinTicket, MediaClient, MediaGateway, MediaToken, SessionOrchestrator,
};
