//! History-consistent invariant: replaying the history rebuilds the board.

use super::Invariant;
use crate::{Board, Game, Square};

/// Invariant: the board is exactly what the move history produces.
///
/// Every recorded move must land on a square that was empty at the time,
/// which also means squares are never overwritten.
pub struct HistoryConsistentInvariant;

impl Invariant<Game> for HistoryConsistentInvariant {
    fn holds(game: &Game) -> bool {
        let mut rebuilt = Board::new();
        for mov in game.history() {
            if !rebuilt.is_empty(mov.position) {
                return false;
            }
            rebuilt.set(mov.position, Square::Occupied(mov.mark));
        }
        rebuilt == *game.board()
    }

    fn description() -> &'static str {
        "Board matches the move history and squares are never overwritten"
    }
}
