//! Typed access to builtin arguments.
//!
//! Each helper names the builtin and the 1-based argument position in its
//! error, so every builtin reports operand mismatches the same way.

use misp_types::{Atom, AtomKind, EvalError, EvalResult, FunctionId, RecordId};

fn mismatch<T>(function: &str, position: usize, expected: &str, found: &Atom) -> EvalResult<T> {
    Err(EvalError::argument(function, position, expected, found.type_name()))
}

pub fn integer(function: &str, position: usize, atom: &Atom) -> EvalResult<i32> {
    match atom.as_integer() {
        Some(v) => Ok(v),
        None => mismatch(function, position, "integer", atom),
    }
}

pub fn string<'a>(function: &str, position: usize, atom: &'a Atom) -> EvalResult<&'a str> {
    match atom.as_str() {
        Some(s) => Ok(s),
        None => mismatch(function, position, "string", atom),
    }
}

pub fn token<'a>(function: &str, position: usize, atom: &'a Atom) -> EvalResult<&'a str> {
    match atom.as_token() {
        Some(t) => Ok(t),
        None => mismatch(function, position, "token", atom),
    }
}

pub fn list<'a>(function: &str, position: usize, atom: &'a Atom) -> EvalResult<&'a [Atom]> {
    match atom.as_list() {
        Some(items) => Ok(items),
        None => mismatch(function, position, "list", atom),
    }
}

pub fn record(function: &str, position: usize, atom: &Atom) -> EvalResult<RecordId> {
    match atom.as_record() {
        Some(id) => Ok(id),
        None => mismatch(function, position, "record", atom),
    }
}

pub fn function(function: &str, position: usize, atom: &Atom) -> EvalResult<FunctionId> {
    match atom.as_function() {
        Some(id) => Ok(id),
        None => mismatch(function, position, "function", atom),
    }
}

/// An integer or decimal operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i32),
    Decimal(f32),
}

impl Number {
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Integer(v) => v as f32,
            Self::Decimal(v) => v,
        }
    }
}

pub fn number(function: &str, position: usize, atom: &Atom) -> EvalResult<Number> {
    match atom.kind {
        AtomKind::Integer(v) => Ok(Number::Integer(v)),
        AtomKind::Decimal(v) => Ok(Number::Decimal(v)),
        _ => mismatch(function, position, "number", atom),
    }
}

/// The `(name value)` pair operands taken by `using`, `with` and `multi-set`.
///
/// Accepts either separate pair operands or the pairs grouped in one list.
pub fn binding_pairs<'a>(function: &str, items: &'a [Atom]) -> EvalResult<Vec<(&'a str, &'a Atom)>> {
    let grouped = match items {
        [single] => single
            .as_list()
            .filter(|inner| inner.first().map_or(true, |first| first.as_list().is_some())),
        _ => None,
    };
    let pairs = grouped.unwrap_or(items);

    pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| match pair.as_list() {
            Some([name, value]) => match name.as_token().or_else(|| name.as_str()) {
                Some(name) => Ok((name, value)),
                None => Err(EvalError::TypeMismatch(format!(
                    "binding {} of `{function}`: name must be a token, found {}",
                    i + 1,
                    name.type_name()
                ))),
            },
            _ => Err(EvalError::TypeMismatch(format!(
                "binding {} of `{function}`: expected a (name value) pair, found {}",
                i + 1,
                pair.type_name()
            ))),
        })
        .collect()
}
