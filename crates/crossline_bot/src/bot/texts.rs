//! User-facing message texts.

use crate::{BoardSymbols, GameError, ParticipantId, SessionId};
use crossline_tictactoe::Mark;

pub(crate) fn greeting() -> String {
    "Hi! Use /newgame to create a game or /join <id> to join one.".to_string()
}

pub(crate) fn join_usage() -> String {
    "Give the game id: /join <id>".to_string()
}

pub(crate) fn unknown_command(name: &str) -> String {
    format!("Unknown command /{name}. Use /newgame or /join <id>.")
}

pub(crate) fn invalid_button() -> String {
    "That button does not belong to a game.".to_string()
}

pub(crate) fn created(id: &SessionId, symbols: &BoardSymbols) -> String {
    format!(
        "Game created! Game id: {id}\nWaiting for a second player...\nYou play {}",
        symbols.mark(Mark::X)
    )
}

pub(crate) fn started(creator: &ParticipantId, joiner: &ParticipantId, symbols: &BoardSymbols) -> String {
    format!(
        "The game has started!\nPlayer 1 ({}): {creator}\nPlayer 2 ({}): {joiner}\n\nPlayer 1 ({}) to move",
        symbols.mark(Mark::X),
        symbols.mark(Mark::O),
        symbols.mark(Mark::X)
    )
}

pub(crate) fn joined(symbols: &BoardSymbols) -> String {
    format!(
        "You joined the game!\nYou play {}\n\nPlayer 1 ({}) to move",
        symbols.mark(Mark::O),
        symbols.mark(Mark::X)
    )
}

pub(crate) fn next_turn(next: &ParticipantId, mark: Mark, symbols: &BoardSymbols) -> String {
    format!("Player {next} ({}) to move", symbols.mark(mark))
}

pub(crate) fn won(winner: &ParticipantId, mark: Mark, symbols: &BoardSymbols) -> String {
    format!("Player {winner} ({}) wins! 🎉", symbols.mark(mark))
}

pub(crate) fn draw() -> String {
    "It's a draw 🤝".to_string()
}

pub(crate) fn rejection(error: &GameError) -> String {
    match error {
        GameError::AlreadyInGame => "You are already in a game!".to_string(),
        GameError::NotFound(_) => "There is no such game.".to_string(),
        GameError::AlreadyFull => "This game is already full.".to_string(),
        GameError::NotInGame => "You are not in a game!".to_string(),
        GameError::NotAPlayer => "You are not playing in this game!".to_string(),
        GameError::AwaitingOpponent => "Wait for a second player to join.".to_string(),
        GameError::NotYourTurn => "It's not your turn!".to_string(),
        GameError::InvalidCell(_) => "That cell is not on the board.".to_string(),
        GameError::CellOccupied(_) => "That cell is taken!".to_string(),
        GameError::Internal(_) => "Something went wrong, please try again.".to_string(),
    }
}
