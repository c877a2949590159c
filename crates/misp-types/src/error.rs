use crate::{Position, SourceFile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A lexical or grammatical fault in MISP source text.
///
/// Parsing stops at the first fault, so there is never more than one.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{file}:{position}: {message}")]
pub struct ParseError {
    /// Source file name.
    pub file: String,
    /// Human-readable error message.
    pub message: String,
    /// Where the fault was detected.
    #[serde(flatten)]
    pub position: Position,
    /// The exact source line for context.
    pub source_line: String,
}

impl ParseError {
    /// Create a new error located in `source`.
    pub fn new(source: &SourceFile, message: impl Into<String>, position: Position) -> Self {
        Self {
            file: source.name.clone(),
            message: message.into(),
            position,
            source_line: source.line(position.line).unwrap_or("").to_string(),
        }
    }
}

/// A runtime fault raised while evaluating an atom.
///
/// There is no in-language recovery construct: every variant propagates to
/// the host unchanged.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum EvalError {
    /// A bare token named no variable in any enclosing scope.
    #[error("variable not found: {0}")]
    UndefinedVariable(String),
    /// The head of a call form named neither a builtin nor a function.
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    /// An operand had the wrong kind.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Too few or too many operands for the callee's signature.
    #[error("arity mismatch: {0}")]
    Arity(String),
    /// Strict own-member access found nothing.
    #[error("member not found: {0}")]
    MissingMember(String),
    /// Division by zero, integer overflow, out-of-range index.
    #[error("arithmetic trap: {0}")]
    ArithmeticTrap(String),
    /// File read/write failure.
    #[error("i/o error: {0}")]
    Io(String),
    /// `parse` was handed malformed text.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The configured step budget ran out.
    #[error("gas exhausted after {0} steps")]
    GasExhausted(u64),
    /// Anything else.
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl EvalError {
    /// A wrongly-kinded operand, naming the callee and 1-based position.
    pub fn argument(function: &str, position: usize, expected: &str, found: &str) -> Self {
        Self::TypeMismatch(format!(
            "argument {position} to `{function}`: expected {expected}, found {found}"
        ))
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// A malformed builtin declaration.
///
/// Registration happens once at startup from library code, so these are
/// programmer errors rather than data-driven faults.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("malformed declaration `{declaration}`: {reason}")]
    MalformedDeclaration { declaration: String, reason: String },
    #[error("builtin `{0}` is already registered")]
    Duplicate(String),
    #[error("declaration does not parse: {0}")]
    Parse(#[from] ParseError),
}

impl SetupError {
    pub fn malformed(declaration: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            declaration: declaration.to_string(),
            reason: reason.into(),
        }
    }
}
