//! Error types for the application

use thiserror::Error;

/// Result type alias using our EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Indexed read beyond the current occupancy of a rolling window
    #[error("Index {index} out of range for window holding {count} values")]
    IndexOutOfRange { index: usize, count: usize },

    /// Instrument was not part of the set configured at startup
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    /// Decimal arithmetic left the representable range
    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),

    /// Same instrument delivered more than once in one tick
    #[error("Duplicate snapshot for {0} in one tick")]
    DuplicateSnapshot(String),

    /// Order execution collaborator rejected an intent
    #[error("Order execution error: {0}")]
    Execution(String),

    /// Narration sink could not emit a message
    #[error("Narration sink error: {0}")]
    Sink(String),

    /// Malformed or unreadable feed input
    #[error("Feed error: {0}")]
    Feed(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Channel send errors
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Configuration(err.to_string())
    }
}
