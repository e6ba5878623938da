//! Transport seam: inbound events and the outbound messaging trait.

use super::keyboard::InlineKeyboard;
use crate::{ChatId, MessageHandle, ParticipantId};
use derive_more::{Display, Error};
use derive_new::new;
use tracing::instrument;

/// A text message sent to the bot.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IncomingMessage {
    /// Sender.
    pub from: ParticipantId,
    /// Chat the message arrived in; replies go there.
    pub chat: ChatId,
    /// Message text.
    #[new(into)]
    pub text: String,
}

/// A press on an inline button.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ButtonPress {
    /// Transport id used to acknowledge the press.
    #[new(into)]
    pub id: String,
    /// Who pressed.
    pub from: ParticipantId,
    /// Button payload.
    #[new(into)]
    pub data: String,
}

/// Outbound half of the messaging platform.
///
/// Implementations deliver messages; the game core never waits on them to
/// decide an outcome.
#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a new message, optionally with buttons, and returns its handle.
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<MessageHandle, TransportError>;

    /// Replaces the text and buttons of an earlier message.
    async fn edit_message(
        &self,
        handle: MessageHandle,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError>;

    /// Acknowledges a button press, optionally with a short notice.
    async fn answer_button(
        &self,
        press: &ButtonPress,
        text: Option<&str>,
    ) -> Result<(), TransportError>;
}

/// Delivery failure reported by a [`Messenger`].
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error: {} at {}:{}", message, file, line)]
pub struct TransportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
