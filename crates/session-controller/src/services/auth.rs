//! Authentication service.
//!
//! Verifies credentials against the user directory. Passwords are compared
//! as stored plaintext - the trust model of a private deployment. Failures
//! are logged server-side without credential material.

use crate::errors::ScError;
use crate::models::User;
use crate::repositories::UserDirectory;
use std::sync::Arc;
use tracing::debug;

/// Credential verification against the user directory.
#[derive(Debug, Clone)]
pub struct AuthService {
    directory: Arc<UserDirectory>,
}

impl AuthService {
    /// Create a new authentication service over `directory`.
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        Self { directory }
    }

    /// Verify `password` for `username`.
    ///
    /// # Errors
    ///
    /// - `UnknownUser` if the username has no directory record
    /// - `InvalidCredentials` if the password does not match exactly
    pub fn authenticate(&self, username: &str, password: &str) -> Result<(), ScError> {
        let user = self.directory.get(username)?;
        if !user.password_matches(password) {
            debug!(
                target: "sc.services.auth",
                username = %username,
                "Password mismatch"
            );
            return Err(ScError::InvalidCredentials {
                username: username.to_string(),
            });
        }
        Ok(())
    }

    /// Retrieve the directory record for `username`.
    ///
    /// Used by the embedding layer to resolve the logged-in user on each
    /// request.
    ///
    /// # Errors
    ///
    /// `UnknownUser` if the username has no directory record.
    pub fn lookup(&self, username: &str) -> Result<User, ScError> {
        self.directory.get(username)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn service() -> AuthService {
        let directory = Arc::new(UserDirectory::new());
        directory.add("alice", "pass", UserRole::Publisher);
        AuthService::new(directory)
    }

    #[test]
    fn test_authenticate_ok() {
        assert!(service().authenticate("alice", "pass").is_ok());
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let err = service().authenticate("alice", "wrong").unwrap_err();
        assert_eq!(err.to_string(), "password incorrect");
    }

    #[test]
    fn test_authenticate_unknown_user() {
        let err = service().authenticate("nobody", "x").unwrap_err();
        assert_eq!(err.to_string(), "login incorrect");
    }

    #[test]
    fn test_lookup() {
        let user = service().lookup("alice").unwrap();
        assert_eq!(user.name, "alice");
        assert_eq!(user.role, UserRole::Publisher);

        let err = service().lookup("nobody").unwrap_err();
        assert!(matches!(err, ScError::UnknownUser { .. }));
    }
}
