//! MISP: a small Lisp-style language with records, closures and
//! persistable environments.
//!
//! ```text
//! source → misp-lexer → misp-parser → Atom → misp-eval ⇄ misp-stdlib
//!                                              ↓
//!                                   serialize → source (reloadable)
//! ```
//!
//! [`Interpreter`] wires the stages together for a host:
//!
//! ```no_run
//! let mut interp = misp::Interpreter::new()?;
//! let value = interp.run("(+ 1 2 3)")?;
//! assert_eq!(interp.emit(&value), "6");
//! # Ok::<(), misp::MispError>(())
//! ```

mod config;
mod error;
mod interpreter;

pub use config::InterpreterConfig;
pub use error::MispError;
pub use interpreter::Interpreter;

pub use misp_eval::{Evaluator, Registry};
pub use misp_stdlib::Pack;
pub use misp_types::{Atom, AtomKind, EvalError, EvalResult, ParseError, RecordId, SetupError};
