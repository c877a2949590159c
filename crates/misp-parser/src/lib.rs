//! MISP parser: converts source text into an atom tree.
//!
//! Grammar:
//!
//! ```text
//! atom   := modifier? (list | record | number | string | token) ('.' atom)?
//! list   := '(' atom* ')'
//! record := '[' '(' name atom ')'* ']'
//! ```
//!
//! `;` starts a line comment. Modifiers are `'` (quote), `$` (expand) and
//! `:` (evaluate); they may not precede records, numbers or strings.

mod member;
mod parser;

pub use member::join_member;
pub use parser::{parse, Parser};
