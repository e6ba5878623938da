//! Pure tic-tac-toe game logic.
//!
//! This crate knows nothing about players, sessions or messaging. It owns
//! the board, the win and draw rules, move history, and the invariants that
//! every reachable game satisfies.
//!
//! ```
//! use crossline_tictactoe::{Game, Mark, Placement, Position};
//!
//! let mut game = Game::new();
//! let placement = game.place(Position::Center).unwrap();
//! assert_eq!(placement, Placement::Continue { next: Mark::O });
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
pub mod invariants;
mod position;
pub mod rules;
mod types;

pub use action::{Move, PlaceError};
pub use game::{Game, GameStatus, Placement};
pub use position::Position;
pub use rules::{LINES, Line};
pub use types::{Board, Mark, Square};
