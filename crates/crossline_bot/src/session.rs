//! Game sessions: one board, two player slots, rendering handles.

use crate::{MessageHandle, ParticipantId, SessionId};
use crossline_tictactoe::{Board, Game, Mark};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    /// Only the creator is seated.
    AwaitingSecondPlayer,
    /// Both players seated; `turn` is the slot to move.
    InProgress {
        /// Slot (0 or 1) whose mark moves next.
        turn: usize,
    },
    /// The game was won or drawn. Finished sessions are removed from the
    /// registry as soon as they reach this phase.
    Finished,
}

/// One pending or running two-player game.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    pub(crate) game: Game,
    players: [Option<ParticipantId>; 2],
    handles: [Option<MessageHandle>; 2],
}

impl Session {
    /// Creates a session with `creator` seated in slot 0.
    #[instrument(skip_all, fields(session_id = %id, creator = %creator))]
    pub(crate) fn new(id: SessionId, creator: ParticipantId) -> Self {
        info!("Creating new game session");
        Self {
            id,
            game: Game::new(),
            players: [Some(creator), None],
            handles: [None, None],
        }
    }

    /// Session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// The underlying game, including move history.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Player slots: creator first, joiner second.
    pub fn players(&self) -> &[Option<ParticipantId>; 2] {
        &self.players
    }

    /// Participant seated in `slot`, if any.
    pub fn player(&self, slot: usize) -> Option<&ParticipantId> {
        self.players.get(slot).and_then(Option::as_ref)
    }

    /// Slot the participant is seated in.
    pub fn slot_of(&self, participant: &ParticipantId) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.as_ref() == Some(participant))
    }

    /// Mark played by the participant.
    pub fn mark_of(&self, participant: &ParticipantId) -> Option<Mark> {
        self.slot_of(participant).and_then(Mark::from_slot)
    }

    /// Slot (0 or 1) whose mark moves next.
    pub fn turn(&self) -> usize {
        self.game.to_move().slot()
    }

    /// Returns true once both slots are filled.
    pub fn is_full(&self) -> bool {
        self.players.iter().all(Option::is_some)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        if self.game.is_over() {
            SessionPhase::Finished
        } else if self.is_full() {
            SessionPhase::InProgress { turn: self.turn() }
        } else {
            SessionPhase::AwaitingSecondPlayer
        }
    }

    /// Rendering handles per slot.
    pub fn handles(&self) -> &[Option<MessageHandle>; 2] {
        &self.handles
    }

    /// Seats `joiner` in slot 1. The registry checks eligibility first.
    pub(crate) fn seat_joiner(&mut self, joiner: ParticipantId) {
        self.players[1] = Some(joiner);
    }

    /// Records where the board is rendered for the participant in `slot`.
    pub(crate) fn set_handle(&mut self, slot: usize, handle: MessageHandle) {
        if let Some(entry) = self.handles.get_mut(slot) {
            *entry = Some(handle);
        }
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id.clone(),
            board: self.game.board().clone(),
            players: self.players.clone(),
            turn: self.turn(),
            phase: self.phase(),
            handles: self.handles,
        }
    }
}

/// Read-only snapshot of a session, handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Session id.
    pub id: SessionId,
    /// Board at snapshot time.
    pub board: Board,
    /// Player slots.
    pub players: [Option<ParticipantId>; 2],
    /// Slot whose mark moves next.
    pub turn: usize,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Rendering handles per slot.
    pub handles: [Option<MessageHandle>; 2],
}

impl SessionView {
    /// Participant whose turn it is, if seated.
    pub fn player_to_move(&self) -> Option<&ParticipantId> {
        self.players.get(self.turn).and_then(Option::as_ref)
    }
}
