//! The tic-tac-toe game: board, side to move, history and status.

use super::action::{Move, PlaceError};
use super::invariants::{GameInvariants, InvariantSet};
use super::rules::{self, Line};
use super::{Board, Mark, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Mark),
    /// Game ended in a draw.
    Draw,
}

/// Result of an accepted placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Game continues; `next` moves now.
    Continue {
        /// Mark to move next.
        next: Mark,
    },
    /// The placing mark completed `line`.
    Won {
        /// Winning mark.
        winner: Mark,
        /// The completed line.
        line: Line,
    },
    /// Board is full with no winning line.
    Draw,
}

impl Placement {
    /// Returns true for `Won` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Placement::Continue { .. })
    }
}

/// Tic-tac-toe game engine.
///
/// `X` always moves first. The side to move only changes after a
/// placement that leaves the game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub(crate) board: Board,
    pub(crate) to_move: Mark,
    pub(crate) history: Vec<Move>,
    pub(crate) status: GameStatus,
}

impl Game {
    /// Creates a new game with an empty board and `X` to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            history: Vec::new(),
            status: GameStatus::InProgress,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark to move.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the move history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true once the game is won or drawn.
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Returns the empty positions.
    pub fn valid_moves(&self) -> Vec<Position> {
        Position::valid_moves(&self.board)
    }

    /// Places the mark to move at `pos`.
    ///
    /// Win is checked before draw, so a move that fills the board and
    /// completes a line is a win. In debug builds the game invariants are
    /// verified afterwards; on violation the move is undone.
    ///
    /// # Errors
    ///
    /// - [`PlaceError::GameOver`] if the game already finished.
    /// - [`PlaceError::SquareOccupied`] if `pos` holds a mark.
    /// - [`PlaceError::InvariantViolation`] if a postcondition fails.
    #[instrument(skip(self), fields(mark = %self.to_move))]
    pub fn place(&mut self, pos: Position) -> Result<Placement, PlaceError> {
        if self.is_over() {
            return Err(PlaceError::GameOver);
        }
        if !self.board.is_empty(pos) {
            return Err(PlaceError::SquareOccupied(pos));
        }

        let before = cfg!(debug_assertions).then(|| self.clone());

        let mark = self.to_move;
        self.board.set(pos, Square::Occupied(mark));
        self.history.push(Move::new(mark, pos));

        let placement = if let Some((winner, line)) = rules::winning_line(&self.board) {
            self.status = GameStatus::Won(winner);
            Placement::Won { winner, line }
        } else if rules::is_full(&self.board) {
            self.status = GameStatus::Draw;
            Placement::Draw
        } else {
            self.to_move = mark.opponent();
            Placement::Continue { next: self.to_move }
        };

        if let Some(before) = before
            && let Err(violations) = GameInvariants::check_all(self)
        {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%descriptions, "Postcondition failed, undoing move");
            *self = before;
            return Err(PlaceError::InvariantViolation(descriptions));
        }

        debug!(?placement, moves = self.history.len(), "Mark placed");
        Ok(placement)
    }

    /// Replays positions from a fresh game, alternating marks from `X`.
    #[instrument]
    pub fn replay(positions: &[Position]) -> Result<Self, PlaceError> {
        let mut game = Self::new();
        for pos in positions {
            game.place(*pos)?;
        }
        Ok(game)
    }

    /// Verifies the game invariants regardless of build profile.
    pub fn verify(&self) -> Result<(), PlaceError> {
        GameInvariants::check_all(self).map_err(|violations| {
            PlaceError::InvariantViolation(
                violations
                    .into_iter()
                    .map(|v| v.description)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_x_to_move() {
        let game = Game::new();
        assert_eq!(game.to_move(), Mark::X);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_place_alternates() {
        let mut game = Game::new();
        let placement = game.place(Position::Center).expect("legal move");
        assert_eq!(placement, Placement::Continue { next: Mark::O });
        assert_eq!(game.board().get(Position::Center), Square::Occupied(Mark::X));
        assert_eq!(game.to_move(), Mark::O);
    }

    #[test]
    fn test_place_occupied_leaves_game_untouched() {
        let mut game = Game::new();
        game.place(Position::Center).expect("legal move");
        let snapshot = game.clone();
        assert_eq!(
            game.place(Position::Center),
            Err(PlaceError::SquareOccupied(Position::Center))
        );
        assert_eq!(game, snapshot);
    }

    #[test]
    fn test_win_keeps_winner_to_move() {
        use Position::*;
        let mut game = Game::replay(&[TopLeft, Center, TopCenter, BottomLeft]).expect("replay");
        let placement = game.place(TopRight).expect("legal move");
        assert_eq!(
            placement,
            Placement::Won {
                winner: Mark::X,
                line: [TopLeft, TopCenter, TopRight],
            }
        );
        assert_eq!(game.status(), GameStatus::Won(Mark::X));
        assert_eq!(game.to_move(), Mark::X);
        assert_eq!(game.place(Center), Err(PlaceError::GameOver));
    }

    #[test]
    fn test_draw_on_full_board() {
        use Position::*;
        // X O X / X O O / O X X
        let mut game = Game::replay(&[
            TopLeft,
            TopCenter,
            TopRight,
            Center,
            MiddleLeft,
            MiddleRight,
            BottomCenter,
            BottomLeft,
        ])
        .expect("replay");
        assert_eq!(game.place(BottomRight), Ok(Placement::Draw));
        assert_eq!(game.status(), GameStatus::Draw);
    }

    #[test]
    fn test_last_square_win_beats_draw() {
        use Position::*;
        // X O X / O O X / O X _ : X fills the board and the right column.
        let mut game = Game::replay(&[
            TopLeft,
            TopCenter,
            TopRight,
            MiddleLeft,
            MiddleRight,
            Center,
            BottomCenter,
            BottomLeft,
        ])
        .expect("replay");
        assert_eq!(
            game.place(BottomRight),
            Ok(Placement::Won {
                winner: Mark::X,
                line: [TopRight, MiddleRight, BottomRight],
            })
        );
        assert!(rules::is_full(game.board()));
    }

    #[test]
    fn test_serde_round_trip_preserves_history() {
        use Position::*;
        let game = Game::replay(&[Center, TopLeft]).expect("replay");
        let json = serde_json::to_string(&game).expect("serialize");
        let back: Game = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, game);
        assert!(back.verify().is_ok());
    }
}
