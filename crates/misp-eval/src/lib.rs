//! MISP tree-walking evaluator.
//!
//! Evaluates atom trees produced by `misp-parser` against a heap of records
//! and functions. Builtins are declared through a [`Registry`]; the core set
//! lives in [`builtins`], standard-library packs add theirs the same way.

pub mod args;
pub mod builtins;
mod equality;
mod evaluator;
mod registry;
mod scope_guard;
mod serializer;

pub use builtins::register_core;
pub use equality::atoms_equal;
pub use evaluator::Evaluator;
pub use registry::{Builtin, NativeFn, Registry};
pub use scope_guard::ScopedEvaluator;
pub use serializer::serialize;
