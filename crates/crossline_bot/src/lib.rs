//! Two-player tic-tac-toe sessions hosted by a chat bot.
//!
//! The [`SessionRegistry`] tracks who plays where, [`apply_move`] validates
//! and applies moves, and the [`GameHub`] shares both between concurrent
//! handler tasks. The [`bot`] module turns chat commands and button presses
//! into hub calls and renders boards as inline keyboards.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bot;
mod config;
pub mod console;
mod engine;
mod error;
mod hub;
mod ids;
mod registry;
mod session;

pub use config::{BoardSymbols, BotConfig, ConfigError, LOG_ENV, TOKEN_ENV};
pub use engine::{MoveOutcome, apply_move};
pub use error::{GameError, InternalFault};
pub use hub::{GameHub, MoveReport};
pub use ids::{ChatId, MessageHandle, MessageId, ParticipantId, SessionId};
pub use registry::SessionRegistry;
pub use session::{Session, SessionPhase, SessionView};
