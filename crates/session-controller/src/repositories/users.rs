//! User Directory - authoritative username -> user record store.

use crate::errors::ScError;
use crate::models::{User, UserRole};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// In-memory user directory.
///
/// Reads are concurrent; writes take the exclusive lock so a reader never
/// observes a partially written record.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<String, User>>,
}

impl UserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record for `username`.
    ///
    /// Overwrite is intentional: reseeding the directory is idempotent.
    pub fn add(&self, username: &str, password: &str, role: UserRole) {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users.insert(username.to_string(), User::new(username, password, role));
    }

    /// Retrieve a snapshot of the record for `username`.
    ///
    /// # Errors
    ///
    /// `UnknownUser` ("login incorrect") when no record exists.
    pub fn get(&self, username: &str) -> Result<User, ScError> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users
            .get(username)
            .cloned()
            .ok_or_else(|| ScError::UnknownUser {
                username: username.to_string(),
            })
    }

    /// Populate the demo account set.
    pub fn seed_demo_users(&self) {
        self.add("publisher1", "pass", UserRole::Publisher);
        self.add("publisher2", "pass", UserRole::Publisher);
        self.add("subscriber", "pass", UserRole::Subscriber);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_stored_record() {
        let directory = UserDirectory::new();
        directory.add("alice", "pass", UserRole::Publisher);

        let user = directory.get("alice").unwrap();
        assert_eq!(user.name, "alice");
        assert_eq!(user.role, UserRole::Publisher);
        assert!(user.password_matches("pass"));
    }

    #[test]
    fn test_get_unknown_user() {
        let directory = UserDirectory::new();
        let err = directory.get("nobody").unwrap_err();
        assert_eq!(err.to_string(), "login incorrect");
    }

    #[test]
    fn test_add_overwrites_existing_record() {
        let directory = UserDirectory::new();
        directory.add("alice", "old", UserRole::Subscriber);
        directory.add("alice", "new", UserRole::Moderator);

        let user = directory.get("alice").unwrap();
        assert_eq!(user.role, UserRole::Moderator);
        assert!(user.password_matches("new"));
        assert!(!user.password_matches("old"));
    }

    #[test]
    fn test_demo_seed() {
        let directory = UserDirectory::new();
        directory.seed_demo_users();

        assert!(directory.get("publisher1").unwrap().role.can_publish());
        assert!(directory.get("publisher2").unwrap().role.can_publish());
        assert!(!directory.get("subscriber").unwrap().role.can_publish());
    }
}
