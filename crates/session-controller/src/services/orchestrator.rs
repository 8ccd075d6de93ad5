//! Session orchestrator - the session lifecycle state machine.
//!
//! A session is either Absent or Active from the orchestrator's viewpoint.
//! `join` transitions Absent -> Active (minting via the registry) or adds a
//! participant to an Active session; `depart` removes a participant or, when
//! the departing user owns the session, transitions Active -> Absent and
//! drops all participants with it. `connect` is the full request flow: it
//! resolves the media session through the gateway, issues an access token
//! and then joins.
//!
//! The orchestrator holds only transient registry snapshots; every decision
//! against session state is delegated to a single atomic registry operation.

use crate::errors::ScError;
use crate::repositories::{MemberAddition, MemberRemoval, SessionRegistry, UserDirectory};
use crate::services::media_client::MediaGateway;
use std::sync::Arc;
use tracing::{info, instrument};

/// Everything a client needs to attach to the media server.
#[derive(Debug, Clone)]
pub struct JoinTicket {
    /// External media session identifier.
    pub session_id: String,

    /// Access token for the media server.
    pub token: String,
}

/// Business logic composing the user directory, the session registry and
/// the media gateway.
pub struct SessionOrchestrator {
    directory: Arc<UserDirectory>,
    registry: Arc<SessionRegistry>,
    gateway: Arc<dyn MediaGateway>,
}

impl SessionOrchestrator {
    /// Create a new orchestrator over the given collaborators.
    pub fn new(
        directory: Arc<UserDirectory>,
        registry: Arc<SessionRegistry>,
        gateway: Arc<dyn MediaGateway>,
    ) -> Self {
        Self {
            directory,
            registry,
            gateway,
        }
    }

    /// Create-or-Join: register the session with `username` as owner when
    /// it does not exist yet, otherwise add `username` as a participant.
    ///
    /// The Absent/Active decision and the resulting registry mutation are
    /// one atomic registry operation, so racing joins, creates and
    /// departures always come out as some serial order: a join can never
    /// fail just because a session was deleted between deciding and
    /// subscribing.
    ///
    /// # Errors
    ///
    /// - `UnknownUser` if `username` has no directory record
    /// - `OwnerConflict` if `username` owns the existing session
    /// - `AlreadySubscribed` if `username` is already a participant
    #[instrument(skip(self), fields(session_name = %session_name, username = %username))]
    pub fn join(
        &self,
        session_id: &str,
        session_name: &str,
        username: &str,
    ) -> Result<(), ScError> {
        let user = self.directory.get(username)?;

        match self
            .registry
            .add_member(session_id, session_name, user)?
        {
            MemberAddition::SessionCreated => {
                info!(
                    target: "sc.services.orchestrator",
                    session_name = %session_name,
                    username = %username,
                    "Session created"
                );
            }
            MemberAddition::ParticipantJoined => {
                info!(
                    target: "sc.services.orchestrator",
                    session_name = %session_name,
                    username = %username,
                    "Participant joined session"
                );
            }
        }
        Ok(())
    }

    /// Leave-or-Delete: remove `username` from the session. If `username`
    /// owns it the whole session is deleted and its participants are
    /// dropped with it; otherwise only the participant entry is removed.
    ///
    /// # Errors
    ///
    /// - `UnknownUser` if `username` has no directory record
    /// - `SessionNotFound` if the session is absent
    /// - `ParticipantNotFound` if `username` is neither owner nor participant
    #[instrument(skip(self), fields(session_name = %session_name, username = %username))]
    pub fn depart(&self, session_name: &str, username: &str) -> Result<(), ScError> {
        let user = self.directory.get(username)?;

        match self.registry.remove_member(session_name, &user.name)? {
            MemberRemoval::SessionDeleted => {
                info!(
                    target: "sc.services.orchestrator",
                    session_name = %session_name,
                    username = %username,
                    "Owner departed; session deleted"
                );
            }
            MemberRemoval::ParticipantLeft => {
                info!(
                    target: "sc.services.orchestrator",
                    session_name = %session_name,
                    username = %username,
                    "Participant left session"
                );
            }
        }
        Ok(())
    }

    /// Whether a session named `session_name` is Active.
    pub fn exists(&self, session_name: &str) -> bool {
        self.registry.contains(session_name)
    }

    /// Resolve the external media identifier of an Active session.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` if the session is absent.
    pub fn media_id(&self, session_name: &str) -> Result<String, ScError> {
        Ok(self.registry.get(session_name)?.id)
    }

    /// Full join flow: resolve the media session, issue an access token
    /// and join.
    ///
    /// For an Active session the stored media identifier is reused; for an
    /// Absent one the user must be allowed to publish, and a fresh media
    /// session is allocated through the gateway. The gateway round trips
    /// happen before any registry mutation, so an abandoned request leaves
    /// no partial state.
    ///
    /// # Errors
    ///
    /// - `UnknownUser` if `username` has no directory record
    /// - `PublishDenied` if the session is Absent and the role may not publish
    /// - `Gateway` if the media gateway fails (propagated unchanged)
    /// - any `join` error
    #[instrument(skip(self, display_name), fields(session_name = %session_name, username = %username))]
    pub async fn connect(
        &self,
        session_name: &str,
        username: &str,
        display_name: &str,
    ) -> Result<JoinTicket, ScError> {
        let user = self.directory.get(username)?;

        let session_id = match self.registry.get(session_name) {
            Ok(session) => session.id,
            Err(ScError::SessionNotFound(_)) => {
                if !user.role.can_publish() {
                    // The rejection names the participant as presented to
                    // the session, not the login.
                    return Err(ScError::PublishDenied(display_name.to_string()));
                }
                self.gateway.create_media_session().await?
            }
            Err(e) => return Err(e),
        };

        let metadata = serde_json::json!({ "serverData": display_name }).to_string();
        let ticket = self
            .gateway
            .issue_token(&session_id, user.role, &metadata)
            .await?;

        self.join(&session_id, session_name, &user.name)?;

        Ok(JoinTicket {
            session_id: ticket.session_id,
            token: ticket.token,
        })
    }
}
