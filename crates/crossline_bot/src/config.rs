//! Bot configuration: TOML file, then environment overrides.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Environment variable holding the messaging platform token.
pub const TOKEN_ENV: &str = "CROSSLINE_BOT_TOKEN";

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "CROSSLINE_LOG";

/// Symbols used when rendering the board as buttons.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSymbols {
    /// Symbol for the first player's mark.
    x: String,
    /// Symbol for the second player's mark.
    o: String,
    /// Symbol for an empty cell.
    empty: String,
}

impl BoardSymbols {
    /// Creates a symbol set.
    pub fn new(x: impl Into<String>, o: impl Into<String>, empty: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            o: o.into(),
            empty: empty.into(),
        }
    }

    /// Symbol for `mark`.
    pub fn mark(&self, mark: crossline_tictactoe::Mark) -> &str {
        match mark {
            crossline_tictactoe::Mark::X => &self.x,
            crossline_tictactoe::Mark::O => &self.o,
        }
    }
}

impl Default for BoardSymbols {
    fn default() -> Self {
        Self::new("❌", "⭕", "⬜")
    }
}

/// Configuration for the bot process.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Messaging platform token. The console transport does not need one.
    bot_token: Option<String>,

    /// Tracing filter used when `RUST_LOG` is unset.
    log_filter: String,

    /// Board rendering symbols.
    symbols: BoardSymbols,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            log_filter: default_log_filter(),
            symbols: BoardSymbols::default(),
        }
    }
}

#[instrument]
fn default_log_filter() -> String {
    "info,crossline_bot=debug".to_string()
}

impl BotConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!("Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if given and present, else defaults, then applies
    /// process environment overrides.
    ///
    /// A path that was given explicitly but does not exist falls back to
    /// defaults with a log line, matching a first run without a config.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                info!(
                    "Config file not found at {}, using defaults",
                    path.display()
                );
                Self::default()
            }
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies overrides looked up by environment variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            debug!("Bot token taken from environment");
            self.bot_token = Some(token);
        }
        if let Some(filter) = lookup(LOG_ENV).filter(|f| !f.trim().is_empty()) {
            debug!(%filter, "Log filter taken from environment");
            self.log_filter = filter;
        }
        self
    }

    /// Copy with the token masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.bot_token.is_some() {
            copy.bot_token = Some("***".to_string());
        }
        copy
    }

    /// Serializes to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
