use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Surprisal(#[from] SurprisalError),
}

#[derive(Debug, Error, PartialEq)]
pub enum SurprisalError {
    /// Probabilities handed to the surprisal formula must lie in (0, 1].
    #[error("invalid probability {0}: expected a value in (0, 1]")]
    InvalidProbability(f64),

    #[error("malformed model row {row}: {reason}")]
    MalformedModel { row: usize, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("config file is empty")]
    Empty,

    #[error("config is not valid json: {0}")]
    Parse(String),

    #[error("error parsing {section}-{key}: {value}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("{0}")]
    OutOfRange(String),
}
