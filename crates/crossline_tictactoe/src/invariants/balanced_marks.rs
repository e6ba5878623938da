//! Balanced marks invariant: X is never behind O, and at most one ahead.

use super::Invariant;
use crate::{Game, Mark};

/// Invariant: `count(X) - count(O)` is 0 or 1.
pub struct BalancedMarksInvariant;

impl Invariant<Game> for BalancedMarksInvariant {
    fn holds(game: &Game) -> bool {
        let x = game.board().count(Mark::X);
        let o = game.board().count(Mark::O);
        x == o || x == o + 1
    }

    fn description() -> &'static str {
        "X count equals O count or exceeds it by one"
    }
}
