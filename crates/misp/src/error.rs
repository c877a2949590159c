//! Facade error type.

use misp_types::{EvalError, ParseError, SetupError};
use thiserror::Error;

/// Any failure surfaced by [`crate::Interpreter`].
#[derive(Debug, Error)]
pub enum MispError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    /// A builtin or pack failed to register.
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Reading or writing a persisted environment failed.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A loaded environment evaluated to something other than a record.
    #[error("loading did not produce a record (got {0})")]
    NotARecord(&'static str),
}
