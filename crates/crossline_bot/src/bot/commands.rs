//! Slash command parsing.

use std::str::FromStr;
use tracing::instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(ascii_case_insensitive)]
enum CommandName {
    #[strum(serialize = "start", serialize = "help")]
    Start,
    #[strum(serialize = "newgame")]
    NewGame,
    #[strum(serialize = "join")]
    Join,
}

/// A command sent to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Greeting with usage.
    Start,
    /// Open a new game.
    NewGame,
    /// Join a game by id; `None` when the id is missing.
    Join(Option<String>),
    /// Any other slash command.
    Unknown(String),
}

impl BotCommand {
    /// Parses message text. Returns `None` when the text is not a command.
    ///
    /// A `@botname` suffix on the command word is ignored, as group chats
    /// append it.
    #[instrument]
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let head = words.next()?.strip_prefix('/')?;
        let name = head.split_once('@').map_or(head, |(name, _)| name);

        let command = match CommandName::from_str(name) {
            Ok(CommandName::Start) => BotCommand::Start,
            Ok(CommandName::NewGame) => BotCommand::NewGame,
            Ok(CommandName::Join) => BotCommand::Join(words.next().map(str::to_owned)),
            Err(_) => BotCommand::Unknown(name.to_owned()),
        };
        Some(command)
    }
}
