use blackjack::{RoundError, RulesError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error(transparent)]
    Round(#[from] RoundError),

    #[error("Table is busy: {pending} scheduled step(s) still pending")]
    Busy { pending: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error("Unknown speed '{0}', expected slow, medium, fast or instant")]
    UnknownSpeed(String),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
