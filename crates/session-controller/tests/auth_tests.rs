//! Authentication integration tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use session_controller::{AuthService, ScError, UserDirectory, UserRole};
use std::sync::Arc;

fn directory() -> Arc<UserDirectory> {
    let directory = Arc::new(UserDirectory::new());
    directory.add("alice", "pass", UserRole::Publisher);
    directory.add("bob", "pass", UserRole::Subscriber);
    directory
}

#[test]
fn authenticate_accepts_correct_credentials() {
    let auth = AuthService::new(directory());
    assert!(auth.authenticate("alice", "pass").is_ok());
    assert!(auth.authenticate("bob", "pass").is_ok());
}

#[test]
fn authenticate_rejects_wrong_password() {
    let auth = AuthService::new(directory());
    let err = auth.authenticate("alice", "wrong").unwrap_err();
    assert!(matches!(err, ScError::InvalidCredentials { ref username } if username == "alice"));
    assert_eq!(err.to_string(), "password incorrect");
}

#[test]
fn authenticate_rejects_unknown_user() {
    let auth = AuthService::new(directory());
    let err = auth.authenticate("nobody", "x").unwrap_err();
    assert!(matches!(err, ScError::UnknownUser { ref username } if username == "nobody"));
    assert_eq!(err.to_string(), "login incorrect");
}

#[test]
fn password_comparison_is_case_sensitive() {
    let dir = Arc::new(UserDirectory::new());
    dir.add("carol", "Pass", UserRole::Moderator);
    let auth = AuthService::new(dir);

    assert!(auth.authenticate("carol", "Pass").is_ok());
    assert!(auth.authenticate("carol", "pass").is_err());
    assert!(auth.authenticate("carol", "PASS").is_err());
}

#[test]
fn reseeding_replaces_credentials() {
    let dir = directory();
    let auth = AuthService::new(Arc::clone(&dir));

    dir.add("alice", "rotated", UserRole::Publisher);
    assert!(auth.authenticate("alice", "pass").is_err());
    assert!(auth.authenticate("alice", "rotated").is_ok());
}

#[test]
fn lookup_returns_directory_record() {
    let auth = AuthService::new(directory());

    let user = auth.lookup("bob").unwrap();
    assert_eq!(user.name, "bob");
    assert_eq!(user.role, UserRole::Subscriber);

    let err = auth.lookup("nobody").unwrap_err();
    assert_eq!(err.to_string(), "login incorrect");
}
