//! String utilities. Lengths and indices count characters.

use misp_eval::{args, Registry};
use misp_types::{Atom, EvalError, SetupError};

/// The characters of `text` selected by `start` and `length`, clamped to the
/// string: a negative start eats into the length, a start past the end
/// selects nothing, and the length stops at the end.
fn substring(text: &str, start: i32, length: i32) -> String {
    let (start, length) = if start < 0 {
        (0, length.saturating_add(start))
    } else {
        (start, length)
    };
    let (Ok(start), Ok(length)) = (usize::try_from(start), usize::try_from(length)) else {
        return String::new();
    };
    text.chars().skip(start).take(length).collect()
}

pub fn register(registry: &mut Registry) -> Result<(), SetupError> {
    registry.register("slength string", |_, args| {
        let text = args::string("slength", 1, &args[0])?;
        Ok(Atom::integer(
            i32::try_from(text.chars().count()).unwrap_or(i32::MAX),
        ))
    })?;

    registry.register("sindex string index", |_, args| {
        let text = args::string("sindex", 1, &args[0])?;
        let index = args::integer("sindex", 2, &args[1])?;
        usize::try_from(index)
            .ok()
            .and_then(|i| text.chars().nth(i))
            .map(|c| Atom::integer(c as i32))
            .ok_or_else(|| {
                EvalError::ArithmeticTrap(format!(
                    "sindex: index {index} out of range for \"{text}\""
                ))
            })
    })?;

    registry.register("to-char int", |_, args| {
        let code = args::integer("to-char", 1, &args[0])?;
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .map(|c| Atom::string(c.to_string()))
            .ok_or_else(|| {
                EvalError::TypeMismatch(format!("to-char: {code} is not a character code"))
            })
    })?;

    registry.register("ssubstring string start length", |_, args| {
        let text = args::string("ssubstring", 1, &args[0])?;
        let start = args::integer("ssubstring", 2, &args[1])?;
        let length = args::integer("ssubstring", 3, &args[2])?;
        Ok(Atom::string(substring(text, start, length)))
    })?;

    Ok(())
}
