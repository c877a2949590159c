//! Shared types for the MISP interpreter.
//!
//! This crate defines the atom model, the record/function heap, formal
//! parameter signatures, source positions, error types, and the debug
//! emitter used across the parser and evaluator.

mod error;
mod position;
pub mod atom;
pub mod emit;
pub mod heap;
pub mod signature;

pub use atom::{Atom, AtomKind, Member, Modifier};
pub use emit::{emit, PrintPass};
pub use error::{EvalError, EvalResult, ParseError, SetupError};
pub use heap::{Collected, Function, FunctionId, Heap, Record, RecordId};
pub use position::{Position, SourceFile};
pub use signature::{Convention, Param, Rest, Signature};
