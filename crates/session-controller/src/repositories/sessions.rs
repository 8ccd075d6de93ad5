//! Session Registry - authoritative session name -> session store.
//!
//! Every operation acquires the registry lock exactly once, so each
//! read-then-write sequence (existence check + insert, lookup + delete,
//! lookup + participant mutation) is a single critical section. Two
//! concurrent creates for the same name can never both succeed, and a
//! participant mutation can never interleave with a deletion.

use crate::errors::ScError;
use crate::models::{Session, User};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Outcome of [`SessionRegistry::add_member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAddition {
    /// No session was registered under the name; one was minted with the
    /// joining user as owner.
    SessionCreated,
    /// The session was already registered; the user joined as a
    /// participant.
    ParticipantJoined,
}

/// Outcome of [`SessionRegistry::remove_member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRemoval {
    /// The departing user owned the session; the whole session was removed
    /// and its participants were discarded with it.
    SessionDeleted,
    /// A participant left; the session remains registered.
    ParticipantLeft,
}

/// In-memory session registry.
///
/// The registry exclusively owns all session records. Lookups hand out
/// clones; callers must not treat a clone as current across unrelated
/// calls, because concurrent mutation may have invalidated it.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session with no participants.
    ///
    /// The existence check and the insert happen under one lock
    /// acquisition.
    ///
    /// # Errors
    ///
    /// `SessionExists` if `session_name` is already registered.
    pub fn create(
        &self,
        session_id: &str,
        session_name: &str,
        owner: User,
    ) -> Result<Session, ScError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.entry(session_name.to_string()) {
            Entry::Occupied(_) => Err(ScError::SessionExists(session_name.to_string())),
            Entry::Vacant(entry) => {
                let session = Session::new(session_id, session_name, owner);
                entry.insert(session.clone());
                Ok(session)
            }
        }
    }

    /// Remove the session named `session_name`.
    ///
    /// Participants are discarded with the session; no notification is
    /// delivered to them.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` if absent.
    pub fn delete(&self, session_name: &str) -> Result<(), ScError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .remove(session_name)
            .map(|_| ())
            .ok_or_else(|| ScError::SessionNotFound(session_name.to_string()))
    }

    /// Retrieve a snapshot of the session named `session_name`.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` if absent.
    pub fn get(&self, session_name: &str) -> Result<Session, ScError> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(session_name)
            .cloned()
            .ok_or_else(|| ScError::SessionNotFound(session_name.to_string()))
    }

    /// Whether a session named `session_name` is registered.
    pub fn contains(&self, session_name: &str) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.contains_key(session_name)
    }

    /// Add `user` as a participant of the session named `session_name`.
    ///
    /// Lookup, owner-conflict check, duplicate check and insert run under
    /// one lock acquisition. Returns a snapshot of the updated session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session is absent
    /// - `OwnerConflict` if `user` owns the session
    /// - `AlreadySubscribed` if `user` is already a participant
    pub fn subscribe(&self, session_name: &str, user: User) -> Result<Session, ScError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .get_mut(session_name)
            .ok_or_else(|| ScError::SessionNotFound(session_name.to_string()))?;
        session.subscribe(user)?;
        Ok(session.clone())
    }

    /// Remove the participant named `username` from the session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session is absent
    /// - `ParticipantNotFound` if `username` is not a participant
    pub fn unsubscribe(&self, session_name: &str, username: &str) -> Result<(), ScError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .get_mut(session_name)
            .ok_or_else(|| ScError::SessionNotFound(session_name.to_string()))?;
        session.unsubscribe(username)
    }

    /// Add `user` to the session named `session_name`, minting it when
    /// absent.
    ///
    /// The Absent/Active decision and the resulting mutation run under
    /// one lock acquisition, so the outcome is always serializable with
    /// concurrent creates and deletions: a join can never observe a
    /// session vanish between deciding and mutating.
    ///
    /// # Errors
    ///
    /// - `OwnerConflict` if `user` owns the existing session
    /// - `AlreadySubscribed` if `user` is already a participant
    pub fn add_member(
        &self,
        session_id: &str,
        session_name: &str,
        user: User,
    ) -> Result<MemberAddition, ScError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.entry(session_name.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(Session::new(session_id, session_name, user));
                Ok(MemberAddition::SessionCreated)
            }
            Entry::Occupied(mut entry) => {
                entry.get_mut().subscribe(user)?;
                Ok(MemberAddition::ParticipantJoined)
            }
        }
    }

    /// Remove `username` from the session, as owner or participant.
    ///
    /// Owner wins: if `username` owns the session the whole session is
    /// removed, otherwise only the participant entry. The ownership check
    /// and the removal run under one lock acquisition, so the decision can
    /// never be made against a session that a concurrent call has already
    /// replaced.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session is absent
    /// - `ParticipantNotFound` if `username` is neither owner nor participant
    pub fn remove_member(
        &self,
        session_name: &str,
        username: &str,
    ) -> Result<MemberRemoval, ScError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let is_owner = sessions
            .get(session_name)
            .map(|session| session.is_owner(username))
            .ok_or_else(|| ScError::SessionNotFound(session_name.to_string()))?;

        if is_owner {
            sessions.remove(session_name);
            return Ok(MemberRemoval::SessionDeleted);
        }

        match sessions.get_mut(session_name) {
            Some(session) => {
                session.unsubscribe(username)?;
                Ok(MemberRemoval::ParticipantLeft)
            }
            None => Err(ScError::SessionNotFound(session_name.to_string())),
        }
    }
}
