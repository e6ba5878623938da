//! Chat bot layer: commands, board keyboards and the messaging seam.

mod commands;
mod handler;
mod keyboard;
mod messenger;
mod texts;

pub use commands::BotCommand;
pub use handler::BotHandler;
pub use keyboard::{
    InlineButton, InlineKeyboard, MOVE_PREFIX, move_payload, parse_move_payload, render_board,
};
pub use messenger::{ButtonPress, IncomingMessage, Messenger, TransportError};
