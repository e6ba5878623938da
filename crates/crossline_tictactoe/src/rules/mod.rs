//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board); the game and any outer
//! session layer compose them.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, Line, check_winner, winning_line};
