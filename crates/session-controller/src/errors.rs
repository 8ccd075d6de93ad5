//! Session Controller error types.
//!
//! Error messages are part of the observable contract: the embedding layer
//! renders them directly as user-facing redirect messages, so the wording
//! is fixed. Each variant carries the kind of failure plus the offending
//! key; the core never recovers from any of these locally.

use thiserror::Error;

/// Session Controller error type.
///
/// - `UnknownUser`, `SessionNotFound`, `ParticipantNotFound`: not-found
///   family, distinguished by which key space missed
/// - `SessionExists`: duplicate session name on creation
/// - `InvalidCredentials`: password mismatch during authentication
/// - `OwnerConflict`, `AlreadySubscribed`: membership invariant violations
/// - `PublishDenied`: role does not permit minting a new session
/// - `Gateway`: opaque media gateway failure, propagated unchanged
#[derive(Debug, Error)]
pub enum ScError {
    /// No directory record for the username.
    #[error("login incorrect")]
    UnknownUser { username: String },

    /// Password does not match the stored credential.
    #[error("password incorrect")]
    InvalidCredentials { username: String },

    /// A session with this name is already registered.
    #[error("session {0} already exists")]
    SessionExists(String),

    /// No session registered under this name.
    #[error("session {0} does not exists")]
    SessionNotFound(String),

    /// The user is not a participant of the session.
    #[error("user {0} does not exists")]
    ParticipantNotFound(String),

    /// A session owner cannot subscribe to their own session.
    #[error("owner {username} can not subscribe session {session}")]
    OwnerConflict { username: String, session: String },

    /// The user is already a participant of the session.
    #[error("user {username} already subscribed to the session {session}")]
    AlreadySubscribed { username: String, session: String },

    /// The user's role does not allow publishing a new session. Carries
    /// the display name the participant presented, not the login.
    #[error("user {0} can not publish")]
    PublishDenied(String),

    /// Media gateway transport or protocol failure.
    #[error("media gateway error: {0}")]
    Gateway(String),
}

impl ScError {
    /// Returns true for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScError::UnknownUser { .. }
                | ScError::SessionNotFound(_)
                | ScError::ParticipantNotFound(_)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_wording_is_stable() {
        let err = ScError::UnknownUser {
            username: "alice".to_string(),
        };
        assert_eq!(err.to_string(), "login incorrect");

        let err = ScError::SessionExists("room".to_string());
        assert_eq!(err.to_string(), "session room already exists");

        let err = ScError::SessionNotFound("room".to_string());
        assert_eq!(err.to_string(), "session room does not exists");

        let err = ScError::ParticipantNotFound("bob".to_string());
        assert_eq!(err.to_string(), "user bob does not exists");

        let err = ScError::OwnerConflict {
            username: "alice".to_string(),
            session: "room".to_string(),
        };
        assert_eq!(err.to_string(), "owner alice can not subscribe session room");

        let err = ScError::AlreadySubscribed {
            username: "bob".to_string(),
            session: "room".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "user bob already subscribed to the session room"
        );
    }

    #[test]
    fn test_not_found_family() {
        assert!(ScError::SessionNotFound("x".to_string()).is_not_found());
        assert!(ScError::UnknownUser {
            username: "x".to_string()
        }
        .is_not_found());
        assert!(!ScError::SessionExists("x".to_string()).is_not_found());
        assert!(!ScError::Gateway("down".to_string()).is_not_found());
    }
}
