//! Evaluation-specific error types.

use thiserror::Error;

/// Errors that can occur while building or running the aggregation engine.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A configured pattern failed to compile.
    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A parser error, e.g. an event whose timestamp cannot be composed.
    #[error("{0}")]
    Parser(#[from] greplog_parser::ParserError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, EvalError>;
