use thiserror::Error;

/// Errors that can occur while parsing greplog inputs.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Config is missing the \"greplogconfig\" marker line")]
    MissingMarker,

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Invalid time of day '{0}'")]
    InvalidTime(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ParserError>;
