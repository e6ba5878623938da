//! Move validation and application for one session.
//!
//! The engine performs no I/O and keeps no state of its own: it is a
//! function of (session, move) to (mutated session, outcome).

use crate::{GameError, InternalFault, ParticipantId, Session};
use crossline_tictactoe::{Line, Mark, PlaceError, Placement, Position};
use tracing::{info, instrument, warn};

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The mover completed a line.
    Win {
        /// Participant who won.
        winner: ParticipantId,
        /// Winner's mark.
        mark: Mark,
        /// The completed line.
        line: Line,
    },
    /// The board is full and no line was completed.
    Draw,
    /// The game goes on with the other player.
    Continue {
        /// Participant to move next.
        next: ParticipantId,
        /// Their mark.
        mark: Mark,
    },
}

impl MoveOutcome {
    /// Returns true for `Win` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MoveOutcome::Continue { .. })
    }
}

/// Applies `participant`'s move at `cell` to `session`.
///
/// Preconditions are checked in order, each with its own error:
/// not a player, second slot empty, not their turn, cell out of range,
/// cell occupied. A rejected move leaves the session untouched. An accepted
/// move changes exactly one cell from empty to the mover's mark; the turn
/// only flips when the game continues.
#[instrument(skip(session), fields(session_id = %session.id()))]
pub fn apply_move(
    session: &mut Session,
    participant: &ParticipantId,
    cell: usize,
) -> Result<MoveOutcome, GameError> {
    let slot = session.slot_of(participant).ok_or_else(|| {
        warn!(%participant, "Move from participant outside the game");
        GameError::NotAPlayer
    })?;

    if !session.is_full() {
        warn!(%participant, "Move before a second player joined");
        return Err(GameError::AwaitingOpponent);
    }

    if slot != session.turn() {
        warn!(%participant, slot, turn = session.turn(), "Move out of turn");
        return Err(GameError::NotYourTurn);
    }

    let pos = Position::from_index(cell).ok_or_else(|| {
        warn!(%participant, cell, "Cell index out of range");
        GameError::InvalidCell(cell)
    })?;

    if !session.board().is_empty(pos) {
        warn!(%participant, cell, "Cell already occupied");
        return Err(GameError::CellOccupied(cell));
    }

    let placement = session.game.place(pos).map_err(|e| match e {
        PlaceError::SquareOccupied(_) => GameError::CellOccupied(cell),
        PlaceError::GameOver => GameError::Internal(InternalFault::new(format!(
            "finished session {} still accepting moves",
            session.id()
        ))),
        PlaceError::InvariantViolation(detail) => GameError::Internal(InternalFault::new(detail)),
    })?;

    let outcome = match placement {
        Placement::Won { winner, line } => MoveOutcome::Win {
            winner: participant.clone(),
            mark: winner,
            line,
        },
        Placement::Draw => MoveOutcome::Draw,
        Placement::Continue { next } => {
            let next_player = session.player(next.slot()).cloned().ok_or_else(|| {
                InternalFault::new(format!("session {} has no player for {next}", session.id()))
            })?;
            MoveOutcome::Continue {
                next: next_player,
                mark: next,
            }
        }
    };

    info!(%participant, cell, ?outcome, "Move applied");
    Ok(outcome)
}
