//! `parse`, `eval`, token/string conversion, `to-int` and `rand`.

use misp_types::{Atom, AtomKind, EvalError, SetupError};
use rand::Rng;

use crate::args;
use crate::registry::Registry;

pub(super) fn register(registry: &mut Registry) -> Result<(), SetupError> {
    registry.register("parse str", |ev, args| {
        let text = args::string("parse", 1, &args[0])?;
        Ok(misp_parser::parse(text, &mut ev.heap)?)
    })?;

    // The operand arrives evaluated; evaluating it again runs parsed code.
    registry.register("eval atom", |ev, args| ev.eval(&args[0]))?;

    registry.register("stot string", |_, args| {
        Ok(Atom::token(args::string("stot", 1, &args[0])?))
    })?;

    registry.register("ttos string", |_, args| {
        Ok(Atom::string(args::token("ttos", 1, &args[0])?))
    })?;

    registry.register("to-int value", |_, args| match &args[0].kind {
        AtomKind::Integer(_) => Ok(args[0].clone()),
        AtomKind::Decimal(v) => Ok(Atom::integer(*v as i32)),
        AtomKind::String(s) => s.trim().parse::<i32>().map(Atom::integer).map_err(|_| {
            EvalError::TypeMismatch(format!("could not convert \"{s}\" to an integer"))
        }),
        _ => Err(EvalError::argument(
            "to-int",
            1,
            "integer, decimal or string",
            args[0].type_name(),
        )),
    })?;

    // Uniform in [min, max).
    registry.register("rand min max", |_, args| {
        let min = args::integer("rand", 1, &args[0])?;
        let max = args::integer("rand", 2, &args[1])?;
        if min > max {
            return Err(EvalError::Runtime(format!(
                "rand: min {min} is greater than max {max}"
            )));
        }
        if min == max {
            return Ok(Atom::integer(min));
        }
        let mut rng = rand::thread_rng();
        Ok(Atom::integer(rng.gen_range(min..max)))
    })?;

    Ok(())
}
