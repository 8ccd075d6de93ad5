//! Session Controller domain types.
//!
//! `User` and `Session` are value objects: repository lookups hand out
//! clones, never references into shared storage, so a caller can only act
//! on a snapshot. Membership invariants (owner never subscribes, no
//! duplicate participants) are enforced by `Session` itself; the registry
//! wraps these methods in its critical section.

use crate::errors::ScError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Role of a user, ordered by capability.
///
/// The wire strings match the media gateway's role vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// May join existing sessions only.
    Subscriber,
    /// May publish, i.e. mint new sessions.
    Publisher,
    /// Publisher with moderation capabilities on the media server.
    Moderator,
}

impl UserRole {
    /// Returns the media gateway's string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Subscriber => "SUBSCRIBER",
            UserRole::Publisher => "PUBLISHER",
            UserRole::Moderator => "MODERATOR",
        }
    }

    /// Whether this role may create a new session.
    pub fn can_publish(&self) -> bool {
        *self >= UserRole::Publisher
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user.
///
/// The password is held in a [`SecretString`]: Debug and tracing output is
/// redacted, and comparison goes through [`User::password_matches`].
#[derive(Debug, Clone)]
pub struct User {
    /// Unique username, the directory key.
    pub name: String,

    /// Stored credential. Compared as plaintext - the private-deployment
    /// trust model of the original system; a production directory would
    /// store a hash.
    password: SecretString,

    /// Capability level.
    pub role: UserRole,
}

impl User {
    /// Create a new user record.
    pub fn new(name: impl Into<String>, password: impl Into<String>, role: UserRole) -> Self {
        Self {
            name: name.into(),
            password: SecretString::from(password.into()),
            role,
        }
    }

    /// Byte-exact, case-sensitive credential check.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.expose_secret() == candidate
    }
}

/// A named conferencing session.
///
/// The owner is implicitly "in" the session without a participant entry;
/// `participants` holds subscribers only.
#[derive(Debug, Clone)]
pub struct Session {
    /// Identifier issued by the external media server.
    pub id: String,

    /// Unique session name, the registry key.
    pub name: String,

    /// The user who created the session. Only the owner may delete it.
    pub owner: User,

    /// Subscribing participants, keyed by username.
    participants: HashMap<String, User>,
}

impl Session {
    /// Create a new session with no participants.
    pub fn new(id: impl Into<String>, name: impl Into<String>, owner: User) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner,
            participants: HashMap::new(),
        }
    }

    /// Whether `username` is the session owner. Ownership comparison is by
    /// name equality, not record identity.
    pub fn is_owner(&self, username: &str) -> bool {
        self.owner.name == username
    }

    /// Whether `username` is currently a subscribing participant.
    pub fn has_participant(&self, username: &str) -> bool {
        self.participants.contains_key(username)
    }

    /// Number of subscribing participants (excludes the owner).
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Add `user` as a participant.
    ///
    /// # Errors
    ///
    /// - `OwnerConflict` if `user` is the session owner
    /// - `AlreadySubscribed` if `user` is already a participant
    pub fn subscribe(&mut self, user: User) -> Result<(), ScError> {
        if self.is_owner(&user.name) {
            return Err(ScError::OwnerConflict {
                username: user.name,
                session: self.name.clone(),
            });
        }
        if self.participants.contains_key(&user.name) {
            return Err(ScError::AlreadySubscribed {
                username: user.name,
                session: self.name.clone(),
            });
        }
        self.participants.insert(user.name.clone(), user);
        Ok(())
    }

    /// Remove the participant named `username`.
    ///
    /// # Errors
    ///
    /// `ParticipantNotFound` if `username` is not a participant.
    pub fn unsubscribe(&mut self, username: &str) -> Result<(), ScError> {
        if self.participants.remove(username).is_none() {
            return Err(ScError::ParticipantNotFound(username.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn owner() -> User {
        User::new("alice", "pass", UserRole::Publisher)
    }

    #[test]
    fn test_role_ordering_and_publish_threshold() {
        assert!(UserRole::Subscriber < UserRole::Publisher);
        assert!(UserRole::Publisher < UserRole::Moderator);

        assert!(!UserRole::Subscriber.can_publish());
        assert!(UserRole::Publisher.can_publish());
        assert!(UserRole::Moderator.can_publish());
    }

    #[test]
    fn test_role_wire_strings() {
        assert_eq!(UserRole::Subscriber.as_str(), "SUBSCRIBER");
        assert_eq!(UserRole::Publisher.as_str(), "PUBLISHER");
        assert_eq!(UserRole::Moderator.as_str(), "MODERATOR");

        let json = serde_json::to_string(&UserRole::Moderator).unwrap();
        assert_eq!(json, "\"MODERATOR\"");
    }

    #[test]
    fn test_password_comparison_is_exact() {
        let user = User::new("alice", "Secret", UserRole::Subscriber);
        assert!(user.password_matches("Secret"));
        assert!(!user.password_matches("secret"));
        assert!(!user.password_matches("Secret "));
    }

    #[test]
    fn test_user_debug_redacts_password() {
        let user = User::new("alice", "hunter2", UserRole::Subscriber);
        let debug = format!("{user:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let mut session = Session::new("ext-1", "room", owner());
        session
            .subscribe(User::new("bob", "pass", UserRole::Subscriber))
            .unwrap();

        assert!(session.has_participant("bob"));
        assert_eq!(session.participant_count(), 1);

        session.unsubscribe("bob").unwrap();
        assert!(!session.has_participant("bob"));
        assert_eq!(session.participant_count(), 0);
    }

    #[test]
    fn test_owner_cannot_subscribe() {
        let mut session = Session::new("ext-1", "room", owner());
        let err = session.subscribe(owner()).unwrap_err();
        assert!(matches!(err, ScError::OwnerConflict { username, session }
            if username == "alice" && session == "room"));
    }

    #[test]
    fn test_duplicate_subscription_is_an_error() {
        let mut session = Session::new("ext-1", "room", owner());
        session
            .subscribe(User::new("bob", "pass", UserRole::Subscriber))
            .unwrap();
        let err = session
            .subscribe(User::new("bob", "pass", UserRole::Subscriber))
            .unwrap_err();
        assert!(matches!(err, ScError::AlreadySubscribed { .. }));
    }

    #[test]
    fn test_unsubscribe_unknown_participant() {
        let mut session = Session::new("ext-1", "room", owner());
        let err = session.unsubscribe("ghost").unwrap_err();
        assert_eq!(err.to_string(), "user ghost does not exists");
    }
}
