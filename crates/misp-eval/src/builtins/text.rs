//! `format`: positional string templates.

use misp_types::{emit, Atom, EvalError, EvalResult, Heap, SetupError};

use crate::args;
use crate::registry::Registry;

pub(super) fn register(registry: &mut Registry) -> Result<(), SetupError> {
    registry.register("format string *arg", |ev, args| {
        let template = args::string("format", 1, &args[0])?;
        let values = args::list("format", 2, &args[1])?;
        Ok(Atom::string(format_template(template, values, &ev.heap)?))
    })?;
    Ok(())
}

/// Expand `{N}` placeholders with the N-th value; `{{` and `}}` are literal
/// braces. Strings are inserted without quotes, other atoms as emitted.
fn format_template(template: &str, values: &[Atom], heap: &Heap) -> EvalResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) if c.is_ascii_digit() => digits.push(c),
                        _ => {
                            return Err(EvalError::Runtime(format!(
                                "format: malformed placeholder in \"{template}\""
                            )))
                        }
                    }
                }
                let index: usize = digits.parse().map_err(|_| {
                    EvalError::Runtime(format!("format: empty placeholder in \"{template}\""))
                })?;
                let Some(value) = values.get(index) else {
                    return Err(EvalError::Runtime(format!(
                        "format: placeholder {{{index}}} has no argument ({} given)",
                        values.len()
                    )));
                };
                match value.as_str() {
                    Some(s) => out.push_str(s),
                    None => out.push_str(&emit(value, heap)),
                }
            }
            '}' => {
                return Err(EvalError::Runtime(format!(
                    "format: unmatched '}}' in \"{template}\""
                )))
            }
            _ => out.push(ch),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(template: &str, values: &[Atom]) -> EvalResult<String> {
        format_template(template, values, &Heap::new())
    }

    #[test]
    fn test_placeholders() {
        let values = [Atom::string("x"), Atom::integer(3), Atom::decimal(1.5)];
        assert_eq!(fmt("{0}={1} ({2}) {0}", &values).unwrap(), "x=3 (1.5) x");
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(fmt("{{{0}}}", &[Atom::integer(1)]).unwrap(), "{1}");
    }

    #[test]
    fn test_errors() {
        assert!(fmt("{1}", &[Atom::integer(1)]).is_err());
        assert!(fmt("{x}", &[]).is_err());
        assert!(fmt("{}", &[]).is_err());
        assert!(fmt("a } b", &[]).is_err());
    }
}
