//! # Quote Error Type
//!
//! Everything the CLI can fail on, with a short machine-readable code.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in boardworks-quote                       │
//! │                                                                         │
//! │  read file ───── io::Error ──────────┐                                  │
//! │  parse JSON ──── serde_json::Error ──┤                                  │
//! │  parse TOML ──── toml::de::Error ────┼──► QuoteError ──► stderr + exit 1│
//! │  core rules ──── CoreError ──────────┤                                  │
//! │  quantity ────── ValidationError ────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use boardworks_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type QuoteResult<T> = Result<T, QuoteError>;

#[derive(Debug, Error)]
pub enum QuoteError {
    /// Input or config file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Board, cart or catalog file is not valid JSON for its purpose.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Config file is not valid TOML or has the wrong shape.
    #[error("Invalid config file {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Input parsed as JSON but has the wrong shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Config loaded but is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Output could not be serialized.
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl QuoteError {
    /// Machine-readable error code, printed next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            QuoteError::Read { .. } => "READ_ERROR",
            QuoteError::Json { .. } => "INVALID_JSON",
            QuoteError::Toml { .. } => "INVALID_CONFIG",
            QuoteError::InvalidInput(_) => "INVALID_INPUT",
            QuoteError::InvalidConfig(_) => "INVALID_CONFIG",
            QuoteError::Output(_) => "OUTPUT_ERROR",
            QuoteError::Core(CoreError::Validation(_)) | QuoteError::Validation(_) => {
                "VALIDATION_ERROR"
            }
            QuoteError::Core(CoreError::MalformedBoard { .. }) => "MALFORMED_BOARD",
            QuoteError::Core(CoreError::InvalidLeadTimeRules { .. }) => "INVALID_CONFIG",
        }
    }
}
