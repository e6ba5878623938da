//! Session registry: game id to session, participant to game id.

use crate::{GameError, InternalFault, MessageHandle, ParticipantId, Session, SessionId};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

/// Owns every active session and the participant index.
///
/// A participant appears in the index iff they are seated in exactly one
/// active session. All mutation goes through the methods below; callers
/// that share a registry across tasks wrap it in a lock (see
/// [`GameHub`](crate::GameHub)).
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    participants: HashMap<ParticipantId, SessionId>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new session with `creator` in slot 0.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyInGame`] if the creator is seated elsewhere.
    #[instrument(skip(self), fields(creator = %creator))]
    pub fn create_session(&mut self, creator: ParticipantId) -> Result<SessionId, GameError> {
        if let Some(existing) = self.participants.get(&creator) {
            warn!(session_id = %existing, "Creator already in a game");
            return Err(GameError::AlreadyInGame);
        }

        let id = SessionId::derived_from(&creator);
        if self.sessions.contains_key(&id) {
            error!(session_id = %id, "Session exists for a creator with no index entry");
            return Err(InternalFault::new(format!(
                "session {id} exists but its creator is not indexed"
            ))
            .into());
        }

        self.participants.insert(creator.clone(), id.clone());
        self.sessions
            .insert(id.clone(), Session::new(id.clone(), creator));
        info!(session_id = %id, active = self.sessions.len(), "Session created");
        Ok(id)
    }

    /// Seats `joiner` in slot 1 of session `id`.
    ///
    /// Checks run in order: the session exists, slot 1 is free, the joiner
    /// is not already seated anywhere (which also stops a creator joining
    /// their own game).
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`], [`GameError::AlreadyFull`] or
    /// [`GameError::AlreadyInGame`].
    #[instrument(skip(self), fields(session_id = %id, joiner = %joiner))]
    pub fn join_session(
        &mut self,
        id: &SessionId,
        joiner: ParticipantId,
    ) -> Result<&Session, GameError> {
        let Some(session) = self.sessions.get_mut(id) else {
            warn!("Join for unknown session");
            return Err(GameError::NotFound(id.clone()));
        };

        if session.is_full() {
            warn!("Join for full session");
            return Err(GameError::AlreadyFull);
        }

        if let Some(existing) = self.participants.get(&joiner) {
            warn!(existing = %existing, "Joiner already in a game");
            return Err(GameError::AlreadyInGame);
        }

        session.seat_joiner(joiner.clone());
        self.participants.insert(joiner, id.clone());
        info!("Second player joined");
        Ok(session)
    }

    /// Session the participant is seated in.
    ///
    /// # Errors
    ///
    /// [`GameError::NotInGame`] if the participant has no active session.
    #[instrument(skip(self))]
    pub fn resolve_session_for(&self, participant: &ParticipantId) -> Result<&SessionId, GameError> {
        self.participants.get(participant).ok_or_else(|| {
            debug!(%participant, "Participant not in a game");
            GameError::NotInGame
        })
    }

    /// Mutable access to the participant's session.
    ///
    /// # Errors
    ///
    /// [`GameError::NotInGame`] if the participant is not indexed, or an
    /// internal fault if the index points at a missing session.
    #[instrument(skip(self))]
    pub fn session_for_mut(
        &mut self,
        participant: &ParticipantId,
    ) -> Result<&mut Session, GameError> {
        let id = self.resolve_session_for(participant)?.clone();
        self.sessions.get_mut(&id).ok_or_else(|| {
            error!(%participant, session_id = %id, "Participant index points at missing session");
            InternalFault::new(format!(
                "participant {participant} indexed to missing session {id}"
            ))
            .into()
        })
    }

    /// Looks up a session by id.
    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Records where the participant's board is rendered.
    ///
    /// # Errors
    ///
    /// Same as [`SessionRegistry::session_for_mut`].
    #[instrument(skip(self))]
    pub fn attach_handle(
        &mut self,
        participant: &ParticipantId,
        handle: MessageHandle,
    ) -> Result<(), GameError> {
        let session = self.session_for_mut(participant)?;
        let slot = session.slot_of(participant).ok_or_else(|| {
            InternalFault::new(format!(
                "participant {participant} indexed to session {} without a seat",
                session.id()
            ))
        })?;
        session.set_handle(slot, handle);
        debug!(slot, %handle, "Rendering handle attached");
        Ok(())
    }

    /// Removes the session and un-indexes both players.
    ///
    /// Idempotent: terminating an unknown id does nothing and returns `None`.
    #[instrument(skip(self))]
    pub fn terminate(&mut self, id: &SessionId) -> Option<Session> {
        let Some(session) = self.sessions.remove(id) else {
            debug!(session_id = %id, "Terminate for unknown session ignored");
            return None;
        };

        for player in session.players().iter().flatten() {
            if self.participants.get(player) == Some(id) {
                self.participants.remove(player);
            }
        }

        info!(session_id = %id, active = self.sessions.len(), "Session terminated");
        Some(session)
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true when no session is active.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of all active sessions.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionPhase;

    fn p(id: &str) -> ParticipantId {
        ParticipantId::new(id)
    }

    #[test]
    fn test_create_registers_creator() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session(p("alice")).expect("create");
        assert_eq!(id, SessionId::new("alice"));
        assert_eq!(registry.resolve_session_for(&p("alice")), Ok(&id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_create_twice_rejected() {
        let mut registry = SessionRegistry::new();
        registry.create_session(p("alice")).expect("create");
        assert_eq!(
            registry.create_session(p("alice")),
            Err(GameError::AlreadyInGame)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_join_checks_in_order() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session(p("alice")).expect("create");

        assert_eq!(
            registry.join_session(&SessionId::new("nobody"), p("bob")).err(),
            Some(GameError::NotFound(SessionId::new("nobody")))
        );
        // Creator joining their own game.
        assert_eq!(
            registry.join_session(&id, p("alice")).err(),
            Some(GameError::AlreadyInGame)
        );

        let session = registry.join_session(&id, p("bob")).expect("join");
        assert_eq!(session.phase(), SessionPhase::InProgress { turn: 0 });

        // Full is reported before the joiner's own membership.
        assert_eq!(
            registry.join_session(&id, p("alice")).err(),
            Some(GameError::AlreadyFull)
        );
        assert_eq!(
            registry.join_session(&id, p("carol")).err(),
            Some(GameError::AlreadyFull)
        );
        assert_eq!(registry.resolve_session_for(&p("carol")), Err(GameError::NotInGame));
    }

    #[test]
    fn test_member_of_other_game_cannot_join() {
        let mut registry = SessionRegistry::new();
        let first = registry.create_session(p("alice")).expect("create");
        registry.create_session(p("bob")).expect("create");
        assert_eq!(
            registry.join_session(&first, p("bob")).err(),
            Some(GameError::AlreadyInGame)
        );
        assert_eq!(registry.session(&first).and_then(|s| s.player(1)), None);
    }

    #[test]
    fn test_terminate_frees_both_and_is_idempotent() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session(p("alice")).expect("create");
        registry.join_session(&id, p("bob")).expect("join");

        assert!(registry.terminate(&id).is_some());
        assert!(registry.is_empty());
        assert_eq!(registry.resolve_session_for(&p("alice")), Err(GameError::NotInGame));
        assert_eq!(registry.resolve_session_for(&p("bob")), Err(GameError::NotInGame));
        assert!(registry.terminate(&id).is_none());

        registry.create_session(p("bob")).expect("bob is free again");
    }

    #[test]
    fn test_attach_handle_targets_participant_slot() {
        use crate::{ChatId, MessageId};
        let mut registry = SessionRegistry::new();
        let id = registry.create_session(p("alice")).expect("create");
        registry.join_session(&id, p("bob")).expect("join");

        let handle = MessageHandle::new(ChatId::from(2), MessageId::from(10));
        registry.attach_handle(&p("bob"), handle).expect("attach");
        let session = registry.session(&id).expect("session");
        assert_eq!(session.handles(), &[None, Some(handle)]);

        assert_eq!(
            registry.attach_handle(&p("carol"), handle),
            Err(GameError::NotInGame)
        );
    }

    #[test]
    fn test_dangling_index_is_internal_fault() {
        let mut registry = SessionRegistry::new();
        let id = registry.create_session(p("alice")).expect("create");
        registry.sessions.remove(&id);
        let err = registry.session_for_mut(&p("alice")).expect_err("dangling");
        assert!(err.is_internal());
    }
}
