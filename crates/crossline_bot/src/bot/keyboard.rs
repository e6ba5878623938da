//! Inline button grid for the board, and the button payload codec.

use crate::BoardSymbols;
use crossline_tictactoe::{Board, Square};
use serde::{Deserialize, Serialize};

/// Prefix of every move button payload.
pub const MOVE_PREFIX: &str = "move_";

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    /// Button label.
    pub text: String,
    /// Payload delivered back when pressed.
    pub callback_data: String,
}

/// Rows of inline buttons attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InlineKeyboard {
    /// Button rows, top to bottom.
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// Iterates over every button, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.inline_keyboard.iter().flatten()
    }
}

/// Payload for the button addressing `cell`.
pub fn move_payload(cell: usize) -> String {
    format!("{MOVE_PREFIX}{cell}")
}

/// Cell index carried by a move payload.
///
/// Returns `None` for anything that is not `move_<digits>`. Indices past the
/// board are returned as-is so the engine can reject them as invalid cells.
pub fn parse_move_payload(data: &str) -> Option<usize> {
    let digits = data.strip_prefix(MOVE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Renders the board as three rows of three buttons.
pub fn render_board(board: &Board, symbols: &BoardSymbols) -> InlineKeyboard {
    let inline_keyboard = board
        .squares()
        .chunks(3)
        .enumerate()
        .map(|(row, squares)| {
            squares
                .iter()
                .enumerate()
                .map(|(col, square)| {
                    let text = match square {
                        Square::Empty => symbols.empty().clone(),
                        Square::Occupied(mark) => symbols.mark(*mark).to_string(),
                    };
                    InlineButton {
                        text,
                        callback_data: move_payload(row * 3 + col),
                    }
                })
                .collect()
        })
        .collect();
    InlineKeyboard { inline_keyboard }
}
