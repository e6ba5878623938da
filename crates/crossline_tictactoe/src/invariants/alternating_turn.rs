//! Alternating turn invariant: marks alternate X, O, X, O, ...

use super::Invariant;
use crate::{Game, Mark};

/// Invariant: marks alternate starting with `X`, and the side to move
/// matches the history length while the game is in progress.
pub struct AlternatingTurnInvariant;

impl Invariant<Game> for AlternatingTurnInvariant {
    fn holds(game: &Game) -> bool {
        let history = game.history();

        let alternates = history
            .iter()
            .enumerate()
            .all(|(i, mov)| Mark::from_slot(i % 2) == Some(mov.mark));
        if !alternates {
            return false;
        }

        if game.is_over() {
            // The mark that ended the game stays to move.
            return history.last().is_some_and(|mov| mov.mark == game.to_move());
        }

        Mark::from_slot(history.len() % 2) == Some(game.to_move())
    }

    fn description() -> &'static str {
        "Marks alternate (X, O, X, O, ...)"
    }
}
