//! Shared, lock-guarded entry point to the registry and engine.

use crate::engine::{self, MoveOutcome};
use crate::{
    GameError, InternalFault, MessageHandle, ParticipantId, SessionId, SessionRegistry,
    SessionView,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, instrument};

/// Outcome of an accepted move plus the board it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// Engine outcome.
    pub outcome: MoveOutcome,
    /// Session snapshot taken right after the move. For terminal outcomes
    /// the session is already gone from the registry.
    pub view: SessionView,
}

/// Cloneable handle to the one registry every handler task shares.
///
/// Each operation holds the registry lock for its whole critical section
/// and never awaits while holding it. Creating, joining, terminating and
/// applying a move (including removing a finished session) are therefore
/// atomic with respect to each other.
#[derive(Debug, Clone, Default)]
pub struct GameHub {
    registry: Arc<Mutex<SessionRegistry>>,
}

impl GameHub {
    /// Creates a hub over an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game hub");
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionRegistry>, GameError> {
        self.registry.lock().map_err(|_| {
            error!("Session registry lock poisoned");
            InternalFault::new("session registry lock poisoned").into()
        })
    }

    /// Opens a new game for `creator`.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyInGame`].
    #[instrument(skip(self))]
    pub fn create_session(&self, creator: ParticipantId) -> Result<SessionId, GameError> {
        self.lock()?.create_session(creator)
    }

    /// Seats `joiner` as the second player of `id`.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`], [`GameError::AlreadyFull`] or
    /// [`GameError::AlreadyInGame`].
    #[instrument(skip(self))]
    pub fn join_session(
        &self,
        id: &SessionId,
        joiner: ParticipantId,
    ) -> Result<SessionView, GameError> {
        let mut registry = self.lock()?;
        registry.join_session(id, joiner).map(|session| session.view())
    }

    /// Applies a move for `participant`, resolving their session first.
    ///
    /// A terminal outcome removes the session and frees both players before
    /// the lock is released.
    ///
    /// # Errors
    ///
    /// [`GameError::NotInGame`] plus every engine rejection.
    #[instrument(skip(self))]
    pub fn apply_move(
        &self,
        participant: &ParticipantId,
        cell: usize,
    ) -> Result<MoveReport, GameError> {
        let mut registry = self.lock()?;
        let session = registry.session_for_mut(participant)?;
        let outcome = engine::apply_move(session, participant, cell)?;
        let view = session.view();

        if outcome.is_terminal() {
            registry.terminate(&view.id);
            info!(session_id = %view.id, ?outcome, "Game finished");
            debug!("Final board:\n{}", view.board.display());
        }

        Ok(MoveReport { outcome, view })
    }

    /// Session the participant plays in.
    ///
    /// # Errors
    ///
    /// [`GameError::NotInGame`].
    #[instrument(skip(self))]
    pub fn resolve_session_for(&self, participant: &ParticipantId) -> Result<SessionId, GameError> {
        self.lock()?.resolve_session_for(participant).cloned()
    }

    /// Records where `participant`'s board is rendered.
    ///
    /// # Errors
    ///
    /// [`GameError::NotInGame`] if the session ended meanwhile.
    #[instrument(skip(self))]
    pub fn attach_handle(
        &self,
        participant: &ParticipantId,
        handle: MessageHandle,
    ) -> Result<(), GameError> {
        self.lock()?.attach_handle(participant, handle)
    }

    /// Removes a session; unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Only an internal fault if the lock is poisoned.
    #[instrument(skip(self))]
    pub fn terminate(&self, id: &SessionId) -> Result<Option<SessionView>, GameError> {
        Ok(self.lock()?.terminate(id).map(|session| session.view()))
    }

    /// Snapshot of session `id`.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`].
    #[instrument(skip(self))]
    pub fn view(&self, id: &SessionId) -> Result<SessionView, GameError> {
        let registry = self.lock()?;
        let view = registry
            .session(id)
            .map(|session| session.view())
            .ok_or_else(|| GameError::NotFound(id.clone()))?;
        debug!(session_id = %id, phase = ?view.phase, "Session viewed");
        Ok(view)
    }

    /// Number of active sessions.
    ///
    /// # Errors
    ///
    /// Only an internal fault if the lock is poisoned.
    pub fn active_sessions(&self) -> Result<usize, GameError> {
        Ok(self.lock()?.len())
    }
}
