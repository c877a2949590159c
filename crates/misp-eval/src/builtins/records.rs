//! Own-member record operations.
//!
//! Unlike `.` access these never climb the parent chain.

use misp_types::{Atom, EvalError, EvalResult, Modifier, Record, SetupError};

use crate::args;
use crate::evaluator::Evaluator;
use crate::registry::Registry;

/// The member name operand of `set`, `get` and `delete`: a bare token, or
/// any expression marked `:` that evaluates to a token or string.
fn member_name(ev: &mut Evaluator, function: &str, raw: &Atom) -> EvalResult<String> {
    let name = if raw.modifier == Modifier::Evaluate {
        ev.eval(raw)?
    } else {
        raw.clone()
    };
    match name.as_token().or_else(|| name.as_str()) {
        Some(name) => Ok(name.to_string()),
        None => Err(EvalError::argument(function, 2, "member name", name.type_name())),
    }
}

pub(super) fn register(registry: &mut Registry) -> Result<(), SetupError> {
    registry.register("set object 'name value", |ev, args| {
        let record = args::record("set", 1, &args[0])?;
        let name = member_name(ev, "set", &args[1])?;
        ev.heap.record_mut(record).insert(&name, args[2].clone());
        Ok(args[2].clone())
    })?;

    registry.register("multi-set object '*pairs", |ev, args| {
        let record = args::record("multi-set", 1, &args[0])?;
        let pairs = args::list("multi-set", 2, &args[1])?;
        for (name, value) in args::binding_pairs("multi-set", pairs)? {
            let value = ev.eval(value)?;
            ev.heap.record_mut(record).insert(name, value);
        }
        Ok(args[0].clone())
    })?;

    // A parentless shallow copy overlaid with new bindings.
    registry.register("with record '+vars", |ev, args| {
        let source = args::record("with", 1, &args[0])?;
        let bindings = args::list("with", 2, &args[1])?;
        let mut copy = Record::new();
        for (name, value) in ev.heap.record(source).iter() {
            copy.insert(name, value.clone());
        }
        for (name, value) in args::binding_pairs("with", bindings)? {
            let value = ev.eval(value)?;
            copy.insert(name, value);
        }
        Ok(Atom::record(ev.heap.alloc_record(copy)))
    })?;

    registry.register("get object 'name", |ev, args| {
        let record = args::record("get", 1, &args[0])?;
        let name = member_name(ev, "get", &args[1])?;
        ev.heap
            .record(record)
            .get(&name)
            .cloned()
            .ok_or(EvalError::MissingMember(name))
    })?;

    registry.register("delete object 'name", |ev, args| {
        let record = args::record("delete", 1, &args[0])?;
        let name = member_name(ev, "delete", &args[1])?;
        Ok(ev.heap.record_mut(record).remove(&name).unwrap_or_default())
    })?;

    // A nil parent detaches the record.
    registry.register("set-parent object parent", |ev, args| {
        let record = args::record("set-parent", 1, &args[0])?;
        let parent = if args[1].is_nil() {
            None
        } else {
            Some(args::record("set-parent", 2, &args[1])?)
        };
        ev.heap.record_mut(record).parent = parent;
        Ok(args[0].clone())
    })?;

    Ok(())
}
