//! Local console transport for playing without a messaging platform.
//!
//! Each input line is one inbound event, processed to completion before the
//! next is read:
//!
//! ```text
//! alice /newgame
//! bob /join alice
//! alice press move_4
//! view alice
//! quit
//! ```

use crate::bot::{BotHandler, ButtonPress, IncomingMessage, InlineKeyboard, Messenger, TransportError};
use crate::{ChatId, MessageHandle, MessageId, ParticipantId, SessionId};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument, warn};

/// [`Messenger`] that prints messages and keyboards to a writer.
#[derive(Debug)]
pub struct ConsoleMessenger<W> {
    out: Mutex<W>,
    next_message: AtomicI64,
}

impl ConsoleMessenger<std::io::Stdout> {
    /// Messenger printing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleMessenger<W> {
    /// Messenger printing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            next_message: AtomicI64::new(1),
        }
    }

    /// Consumes the messenger, returning the writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Prints a line that is not a chat message.
    pub fn note(&self, text: &str) -> Result<(), TransportError> {
        self.write(&format!("{text}\n"))
    }

    fn write(&self, text: &str) -> Result<(), TransportError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| TransportError::new("console writer lock poisoned"))?;
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| TransportError::new(format!("console write failed: {e}")))
    }
}

/// Renders a keyboard as bracketed rows followed by their payloads.
pub fn render_keyboard(keyboard: &InlineKeyboard) -> String {
    keyboard
        .inline_keyboard
        .iter()
        .map(|row| {
            let labels: String = row.iter().map(|b| format!("[{}]", b.text)).collect();
            let payloads: Vec<&str> = row.iter().map(|b| b.callback_data.as_str()).collect();
            format!("  {labels}   {}\n", payloads.join(" "))
        })
        .collect()
}

fn render_message(header: &str, text: &str, keyboard: Option<&InlineKeyboard>) -> String {
    let mut rendered = format!("{header} {text}\n");
    if let Some(keyboard) = keyboard {
        rendered.push_str(&render_keyboard(keyboard));
    }
    rendered
}

#[async_trait::async_trait]
impl<W: Write + Send> Messenger for ConsoleMessenger<W> {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<MessageHandle, TransportError> {
        let message = MessageId::from(self.next_message.fetch_add(1, Ordering::Relaxed));
        let handle = MessageHandle::new(chat, message);
        self.write(&render_message(&format!("[{handle}]"), text, keyboard))?;
        Ok(handle)
    }

    async fn edit_message(
        &self,
        handle: MessageHandle,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        self.write(&render_message(&format!("[{handle} edited]"), text, keyboard))
    }

    async fn answer_button(
        &self,
        press: &ButtonPress,
        text: Option<&str>,
    ) -> Result<(), TransportError> {
        match text {
            Some(text) => self.write(&format!("[press {} -> {}] {text}\n", press.id, press.from)),
            None => Ok(()),
        }
    }
}

/// One parsed console input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    /// Blank line or `#` comment.
    Skip,
    /// Stop reading input.
    Quit,
    /// Print a session snapshot as JSON.
    View(SessionId),
    /// A user pressed a button.
    Press {
        /// Who pressed.
        from: ParticipantId,
        /// Button payload.
        data: String,
    },
    /// A user sent text.
    Message {
        /// Sender.
        from: ParticipantId,
        /// Message text.
        text: String,
    },
}

impl ConsoleLine {
    /// Parses one input line.
    ///
    /// # Errors
    ///
    /// Returns a usage hint when a line names a user but nothing to send.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(ConsoleLine::Skip);
        }
        if matches!(line, "quit" | "exit") {
            return Ok(ConsoleLine::Quit);
        }

        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        if head == "view" && !rest.is_empty() {
            return Ok(ConsoleLine::View(SessionId::new(rest)));
        }
        if rest.is_empty() {
            return Err(format!("usage: <user> <text> | <user> press <payload> (got {line:?})"));
        }

        let from = ParticipantId::new(head);
        match rest.split_once(char::is_whitespace) {
            Some(("press", data)) => Ok(ConsoleLine::Press {
                from,
                data: data.trim().to_string(),
            }),
            _ => Ok(ConsoleLine::Message {
                from,
                text: rest.to_string(),
            }),
        }
    }
}

/// Feeds console lines to `handler` until input ends or `quit` is read.
///
/// Every user gets a private chat with a stable number.
#[instrument(skip_all)]
pub async fn run_console<R, W>(
    handler: &BotHandler<ConsoleMessenger<W>>,
    input: R,
) -> Result<(), TransportError>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send,
{
    let mut lines = input.lines();
    let mut chats: HashMap<ParticipantId, ChatId> = HashMap::new();
    let mut presses = 0u64;

    info!("Console transport ready");
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| TransportError::new(format!("console read failed: {e}")))?
    {
        let parsed = match ConsoleLine::parse(&line) {
            Ok(parsed) => parsed,
            Err(usage) => {
                handler.messenger().note(&usage)?;
                continue;
            }
        };
        debug!(?parsed, "Console event");

        match parsed {
            ConsoleLine::Skip => {}
            ConsoleLine::Quit => break,
            ConsoleLine::View(id) => {
                let text = match handler.hub().view(&id) {
                    Ok(view) => serde_json::to_string_pretty(&view)
                        .map_err(|e| TransportError::new(format!("view encoding failed: {e}")))?,
                    Err(err) => err.to_string(),
                };
                handler.messenger().note(&text)?;
            }
            ConsoleLine::Press { from, data } => {
                presses += 1;
                let press = ButtonPress::new(presses.to_string(), from, data);
                handler.on_button_press(&press).await;
            }
            ConsoleLine::Message { from, text } => {
                let next_chat = ChatId::from(chats.len() as i64 + 1);
                let chat = *chats.entry(from.clone()).or_insert(next_chat);
                handler.on_command(&IncomingMessage::new(from, chat, text)).await;
            }
        }
    }

    if let Ok(active) = handler.hub().active_sessions() {
        info!(active, "Console input finished");
    } else {
        warn!("Console input finished with an unreadable registry");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        assert_eq!(ConsoleLine::parse("   "), Ok(ConsoleLine::Skip));
        assert_eq!(ConsoleLine::parse("# comment"), Ok(ConsoleLine::Skip));
        assert_eq!(ConsoleLine::parse("quit"), Ok(ConsoleLine::Quit));
        assert_eq!(
            ConsoleLine::parse("view alice"),
            Ok(ConsoleLine::View(SessionId::new("alice")))
        );
        assert_eq!(
            ConsoleLine::parse("bob /join alice"),
            Ok(ConsoleLine::Message {
                from: ParticipantId::new("bob"),
                text: "/join alice".to_string(),
            })
        );
        assert_eq!(
            ConsoleLine::parse("alice press move_4"),
            Ok(ConsoleLine::Press {
                from: ParticipantId::new("alice"),
                data: "move_4".to_string(),
            })
        );
        assert!(ConsoleLine::parse("alice").is_err());
    }

    #[test]
    fn test_render_keyboard_rows() {
        let keyboard = crate::bot::render_board(
            &crossline_tictactoe::Board::new(),
            &crate::BoardSymbols::new("X", "O", "."),
        );
        assert_eq!(
            render_keyboard(&keyboard),
            "  [.][.][.]   move_0 move_1 move_2\n  [.][.][.]   move_3 move_4 move_5\n  [.][.][.]   move_6 move_7 move_8\n"
        );
    }

    #[tokio::test]
    async fn test_console_session_plays_to_a_win() {
        let handler = BotHandler::new(
            crate::GameHub::new(),
            ConsoleMessenger::new(Vec::new()),
            crate::BoardSymbols::new("X", "O", "."),
        );
        let script = "alice /newgame\nbob /join alice\n\
                      alice press move_0\nbob press move_3\n\
                      alice press move_1\nbob press move_4\n\
                      alice press move_2\nview alice\n";

        run_console(&handler, script.as_bytes()).await.expect("console run");

        assert_eq!(handler.hub().active_sessions(), Ok(0));
        let output = String::from_utf8(handler_into_output(handler)).expect("utf8");
        assert!(output.contains("Game id: alice"));
        assert!(output.contains("Player alice (X) wins!"));
        assert!(output.contains("No game with id alice"));
    }

    fn handler_into_output(handler: BotHandler<ConsoleMessenger<Vec<u8>>>) -> Vec<u8> {
        handler.into_messenger().into_inner()
    }
}
