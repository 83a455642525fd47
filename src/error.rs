//! Error types for the gamebot crate

use thiserror::Error;

/// Main error type for the gamebot crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("cannot encode state: {message}")]
    Encoding { message: String },

    #[error("no candidate actions to choose from")]
    EmptyActionSet,

    #[error("corrupt Q-table data: {message}")]
    Decode { message: String },

    #[error("action '{action}' is not part of the action space")]
    UnknownAction { action: String },

    #[error("Q-value for action '{action}' is not a number")]
    InvalidValue { action: String },

    #[error("reward {value} must be finite")]
    InvalidReward { value: f64 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid move: {message}")]
    InvalidMove { message: String },

    #[error("game already over")]
    GameOver,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
