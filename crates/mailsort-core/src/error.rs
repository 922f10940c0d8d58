//! Error types for the core library.

use thiserror::Error;

use crate::rules::ConfigError;

/// Errors that can occur in core operations.
///
/// Classification itself never fails; these only arise while building a rule
/// set from configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// The rule set configuration was rejected.
    ///
    /// Carries every problem found, not just the first one.
    #[error("Invalid rule set: {}", join_messages(.0))]
    Config(Vec<ConfigError>),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Configuration problems carried by this error, if any.
    #[must_use]
    pub fn config_errors(&self) -> &[ConfigError] {
        match self {
            Self::Config(errors) => errors,
            _ => &[],
        }
    }
}

fn join_messages(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
