//! Command and button handling on top of the [`GameHub`].

use super::commands::BotCommand;
use super::keyboard::{self, InlineKeyboard};
use super::messenger::{ButtonPress, IncomingMessage, Messenger};
use super::texts;
use crate::engine::MoveOutcome;
use crate::{BoardSymbols, GameError, GameHub, MessageHandle, ParticipantId, SessionId, SessionView};
use tracing::{debug, error, info, instrument, warn};

/// Turns inbound chat events into hub operations and renders the results.
///
/// Delivery failures are logged and dropped: a game outcome is final once
/// the hub returns it.
#[derive(Debug)]
pub struct BotHandler<M> {
    hub: GameHub,
    messenger: M,
    symbols: BoardSymbols,
}

impl<M: Messenger> BotHandler<M> {
    /// Creates a handler.
    pub fn new(hub: GameHub, messenger: M, symbols: BoardSymbols) -> Self {
        Self {
            hub,
            messenger,
            symbols,
        }
    }

    /// The hub this handler drives.
    pub fn hub(&self) -> &GameHub {
        &self.hub
    }

    /// The outbound transport.
    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Consumes the handler, returning its transport.
    pub fn into_messenger(self) -> M {
        self.messenger
    }

    /// Handles a text message. Non-command text is ignored.
    #[instrument(skip(self, message), fields(from = %message.from, chat = %message.chat))]
    pub async fn on_command(&self, message: &IncomingMessage) {
        let Some(command) = BotCommand::parse(&message.text) else {
            debug!("Ignoring non-command text");
            return;
        };
        debug!(?command, "Command received");

        match command {
            BotCommand::NewGame => self.new_game(message).await,
            BotCommand::Join(Some(id)) => self.join(message, SessionId::new(id)).await,
            BotCommand::Start => {
                self.reply(message, &texts::greeting(), None).await;
            }
            BotCommand::Join(None) => {
                self.reply(message, &texts::join_usage(), None).await;
            }
            BotCommand::Unknown(name) => {
                self.reply(message, &texts::unknown_command(&name), None).await;
            }
        }
    }

    /// Handles an inline button press.
    #[instrument(skip(self, press), fields(from = %press.from, data = %press.data))]
    pub async fn on_button_press(&self, press: &ButtonPress) {
        let Some(cell) = keyboard::parse_move_payload(&press.data) else {
            warn!("Unrecognised button payload");
            self.answer(press, Some(&texts::invalid_button())).await;
            return;
        };

        match self.hub.apply_move(&press.from, cell) {
            Ok(report) => {
                let text = match &report.outcome {
                    MoveOutcome::Win { winner, mark, .. } => texts::won(winner, *mark, &self.symbols),
                    MoveOutcome::Draw => texts::draw(),
                    MoveOutcome::Continue { next, mark } => {
                        texts::next_turn(next, *mark, &self.symbols)
                    }
                };
                self.render_to_players(&report.view, &text).await;
                self.answer(press, None).await;
            }
            Err(err) => {
                self.log_rejection(&err);
                self.answer(press, Some(&texts::rejection(&err))).await;
            }
        }
    }

    #[instrument(skip(self, message))]
    async fn new_game(&self, message: &IncomingMessage) {
        let id = match self.hub.create_session(message.from.clone()) {
            Ok(id) => id,
            Err(err) => {
                self.log_rejection(&err);
                self.reply(message, &texts::rejection(&err), None).await;
                return;
            }
        };

        let board = crossline_tictactoe::Board::new();
        let keyboard = keyboard::render_board(&board, &self.symbols);
        let text = texts::created(&id, &self.symbols);
        if let Some(handle) = self.reply(message, &text, Some(&keyboard)).await {
            self.attach(&message.from, handle);
        }
        info!(session_id = %id, "New game announced");
    }

    #[instrument(skip(self, message))]
    async fn join(&self, message: &IncomingMessage, id: SessionId) {
        let view = match self.hub.join_session(&id, message.from.clone()) {
            Ok(view) => view,
            Err(err) => {
                self.log_rejection(&err);
                self.reply(message, &texts::rejection(&err), None).await;
                return;
            }
        };

        let keyboard = keyboard::render_board(&view.board, &self.symbols);
        if let (Some(creator), Some(joiner)) = (&view.players[0], &view.players[1]) {
            if let Some(handle) = view.handles[0] {
                let text = texts::started(creator, joiner, &self.symbols);
                self.edit(handle, &text, &keyboard).await;
            } else {
                debug!("Creator has no rendered board to update");
            }
        }

        if let Some(handle) = self
            .reply(message, &texts::joined(&self.symbols), Some(&keyboard))
            .await
        {
            self.attach(&message.from, handle);
        }
        info!(session_id = %id, "Join announced");
    }

    async fn render_to_players(&self, view: &SessionView, text: &str) {
        let keyboard = keyboard::render_board(&view.board, &self.symbols);
        for handle in view.handles.iter().flatten() {
            self.edit(*handle, text, &keyboard).await;
        }
    }

    async fn reply(
        &self,
        message: &IncomingMessage,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Option<MessageHandle> {
        match self.messenger.send_message(message.chat, text, keyboard).await {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(error = %err, chat = %message.chat, "Failed to send message");
                None
            }
        }
    }

    async fn edit(&self, handle: MessageHandle, text: &str, keyboard: &InlineKeyboard) {
        if let Err(err) = self.messenger.edit_message(handle, text, Some(keyboard)).await {
            warn!(error = %err, %handle, "Failed to update board message");
        }
    }

    async fn answer(&self, press: &ButtonPress, text: Option<&str>) {
        if let Err(err) = self.messenger.answer_button(press, text).await {
            warn!(error = %err, press_id = %press.id, "Failed to answer button press");
        }
    }

    fn attach(&self, participant: &ParticipantId, handle: MessageHandle) {
        // The game may already be over if the other player was quick.
        if let Err(err) = self.hub.attach_handle(participant, handle) {
            debug!(error = %err, %participant, "Rendering handle not attached");
        }
    }

    fn log_rejection(&self, err: &GameError) {
        if err.is_internal() {
            error!(error = %err, "Internal fault while handling request");
        } else {
            debug!(error = %err, "Request rejected");
        }
    }
}
