//! Boolean logic, equality, branching and `while`.
//!
//! Booleans are integers: results are `1` or `0`, and conditions accept any
//! non-zero integer as true.

use misp_types::{Atom, AtomKind, EvalError, SetupError};

use crate::args;
use crate::equality::atoms_equal;
use crate::registry::Registry;

/// `&` counts the integer 1 and any non-nil, non-integer atom as true.
fn logically_true(atom: &Atom) -> bool {
    match atom.kind {
        AtomKind::Integer(v) => v == 1,
        AtomKind::Nil => false,
        _ => true,
    }
}

pub(super) fn register(registry: &mut Registry) -> Result<(), SetupError> {
    registry.register("& +args", |_, args| {
        let values = args::list("&", 1, &args[0])?;
        Ok(Atom::boolean(values.iter().all(logically_true)))
    })?;

    registry.register("= +args", |_, args| {
        let values = args::list("=", 1, &args[0])?;
        let all_equal = match values.split_first() {
            Some((first, rest)) => rest.iter().all(|v| atoms_equal(first, v)),
            None => true,
        };
        Ok(Atom::boolean(all_equal))
    })?;

    registry.register("? condition 'then 'else", |ev, args| {
        let branch = if args[0].is_true() { &args[1] } else { &args[2] };
        ev.eval(branch)
    })?;

    registry.register("select '+branches", |ev, args| {
        let branches = args::list("select", 1, &args[0])?;
        for (i, branch) in branches.iter().enumerate() {
            let Some([condition, body]) = branch.as_list() else {
                return Err(EvalError::TypeMismatch(format!(
                    "branch {} of `select` must be a (condition body) pair",
                    i + 1
                )));
            };
            if ev.eval(condition)?.is_true() {
                return ev.eval(body);
            }
        }
        Ok(Atom::nil())
    })?;

    registry.register("while 'condition 'body", |ev, args| {
        while ev.eval(&args[0])?.is_true() {
            ev.eval(&args[1])?;
        }
        Ok(Atom::nil())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logically_true() {
        assert!(logically_true(&Atom::integer(1)));
        assert!(!logically_true(&Atom::integer(2)));
        assert!(!logically_true(&Atom::nil()));
        assert!(logically_true(&Atom::string("")));
    }
}
