//! Identifier types shared by the registry, the engine and the bot layer.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// A chat user taking part in games.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Wraps a raw user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a game session.
///
/// Derived from the creator's participant id. A creator has at most one
/// active session, so the derived id is unique among active sessions.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a raw session identifier, e.g. the argument of `/join`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Session id for a game created by `creator`.
    pub fn derived_from(creator: &ParticipantId) -> Self {
        Self(creator.as_str().to_owned())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Chat a message lives in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct ChatId(i64);

impl ChatId {
    /// Returns the raw chat number.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// Message number within a chat.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    /// Returns the raw message number.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// Where a rendered board lives, so it can be edited after each move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{chat}/{message}")]
pub struct MessageHandle {
    /// Chat holding the message.
    pub chat: ChatId,
    /// The message itself.
    pub message: MessageId,
}

impl MessageHandle {
    /// Creates a handle.
    pub fn new(chat: ChatId, message: MessageId) -> Self {
        Self { chat, message }
    }
}
