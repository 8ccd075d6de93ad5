//! In-memory repositories for Session Controller.
//!
//! Both stores are constructed once at process start and passed by handle
//! to the services; there is no ambient global state. State is transient
//! and process-local.

pub mod sessions;
pub mod users;

pub use sessions::{MemberAddition, MemberRemoval, SessionRegistry};
pub use users::UserDirectory;
