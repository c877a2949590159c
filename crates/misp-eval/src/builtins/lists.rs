//! List construction and access.

use misp_types::{Atom, AtomKind, EvalError, EvalResult, SetupError};

use crate::args;
use crate::registry::Registry;

/// Bounds-checked conversion of a MISP index.
fn checked_index(function: &str, index: i32, len: usize) -> EvalResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| {
            EvalError::ArithmeticTrap(format!(
                "{function}: index {index} out of range for length {len}"
            ))
        })
}

pub(super) fn register(registry: &mut Registry) -> Result<(), SetupError> {
    // The rest formal already collects the evaluated operands into a list.
    registry.register("list *values", |_, args| Ok(args[0].clone()))?;

    registry.register("length list-or-string", |_, args| {
        let len = match &args[0].kind {
            AtomKind::List(items) => items.len(),
            AtomKind::String(s) => s.chars().count(),
            _ => {
                return Err(EvalError::argument(
                    "length",
                    1,
                    "list or string",
                    args[0].type_name(),
                ))
            }
        };
        Ok(Atom::integer(i32::try_from(len).unwrap_or(i32::MAX)))
    })?;

    // On a string, yields the character code at the index.
    registry.register("index-get list index", |_, args| {
        let index = args::integer("index-get", 2, &args[1])?;
        match &args[0].kind {
            AtomKind::List(items) => {
                let i = checked_index("index-get", index, items.len())?;
                Ok(items[i].clone())
            }
            AtomKind::String(s) => {
                let len = s.chars().count();
                let i = checked_index("index-get", index, len)?;
                let code = s.chars().nth(i).map_or(0, |c| c as i32);
                Ok(Atom::integer(code))
            }
            _ => Err(EvalError::argument(
                "index-get",
                1,
                "list or string",
                args[0].type_name(),
            )),
        }
    })?;

    registry.register("replace-at list index value", |_, args| {
        let items = args::list("replace-at", 1, &args[0])?;
        let index = args::integer("replace-at", 2, &args[1])?;
        let i = checked_index("replace-at", index, items.len())?;
        let mut replaced = items.to_vec();
        replaced[i] = args[2].clone();
        Ok(Atom::list(replaced))
    })?;

    // Evaluates `code` once per element.
    registry.register("array count 'code", |ev, args| {
        let count = args::integer("array", 1, &args[0])?;
        let mut items = Vec::with_capacity(usize::try_from(count).unwrap_or(0));
        for _ in 0..count {
            items.push(ev.eval(&args[1])?);
        }
        Ok(Atom::list(items))
    })?;

    registry.register("last +list", |_, args| {
        let items = args::list("last", 1, &args[0])?;
        Ok(items.last().cloned().unwrap_or_default())
    })?;

    registry.register("reverse list", |_, args| {
        let items = args::list("reverse", 1, &args[0])?;
        Ok(Atom::list(items.iter().rev().cloned().collect::<Vec<_>>()))
    })?;

    Ok(())
}
