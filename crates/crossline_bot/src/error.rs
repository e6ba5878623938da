//! Game error types.

use crate::SessionId;
use derive_more::{Display, Error};
use tracing::instrument;

/// Rejection of a session or move operation.
///
/// Every variant except [`GameError::Internal`] is an expected, user-facing
/// condition; the operation that produced it left all state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameError {
    /// The participant already plays in an active session.
    #[display("Participant is already in a game")]
    AlreadyInGame,

    /// No active session has this id.
    #[display("No game with id {}", _0)]
    NotFound(SessionId),

    /// Both player slots are taken.
    #[display("Game is already full")]
    AlreadyFull,

    /// The participant is not part of any active session.
    #[display("Participant is not in a game")]
    NotInGame,

    /// The participant is not one of the session's players.
    #[display("Participant is not a player in this game")]
    NotAPlayer,

    /// The second slot is still empty.
    #[display("Waiting for a second player")]
    AwaitingOpponent,

    /// The other player is to move.
    #[display("Not this participant's turn")]
    NotYourTurn,

    /// Cell index outside 0-8.
    #[display("Cell {} is outside the board", _0)]
    InvalidCell(usize),

    /// The target cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(usize),

    /// Registry or session data is inconsistent.
    #[display("{}", _0)]
    Internal(InternalFault),
}

impl GameError {
    /// Returns true for internal-consistency faults rather than user errors.
    pub fn is_internal(&self) -> bool {
        matches!(self, GameError::Internal(_))
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Internal(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<InternalFault> for GameError {
    fn from(fault: InternalFault) -> Self {
        GameError::Internal(fault)
    }
}

/// Internal-consistency fault with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Internal fault: {} at {}:{}", message, file, line)]
pub struct InternalFault {
    /// Error message.
    pub message: String,
    /// Line number where the fault was detected.
    pub line: u32,
    /// Source file where the fault was detected.
    pub file: &'static str,
}

impl InternalFault {
    /// Creates a new fault with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
