use crate::UserId;
use std::path::PathBuf;

/// Top-level error type for recipebot.
///
/// Each variant corresponds to one failure surface of the bot. None of them
/// is fatal once the bot is running: the dialogue layer turns every variant
/// into a chat reply.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// The sender is not part of the configured allow-list.
    #[error("Unauthorized sender: {0}")]
    Unauthorized(UserId),

    /// An action arrived for a user with no active session.
    #[error("No active session for user {0}")]
    SessionNotFound(UserId),

    /// The recipe document could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    PersistenceRead {
        /// Location of the document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The recipe document could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    PersistenceWrite {
        /// Location of the document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The recipe document exists but is not a valid collection.
    #[error("Corrupt document {}: {source}", path.display())]
    Corrupt {
        /// Location of the document.
        path: PathBuf,
        /// Deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from a chat channel (e.g. the Telegram API).
    #[error("Channel error: {0}")]
    Channel(String),

    /// An error from an outbound HTTP request.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Whether this error comes from the recipe document (read, parse or write).
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::PersistenceRead { .. } | Self::PersistenceWrite { .. } | Self::Corrupt { .. }
        )
    }
}

/// A convenience `Result` alias using [`BotError`].
pub type BotResult<T> = Result<T, BotError>;
