//! `let` and `using`: the two scope-level forms.

use misp_types::{EvalError, Record, SetupError};

use crate::args;
use crate::registry::Registry;

pub(super) fn register(registry: &mut Registry) -> Result<(), SetupError> {
    // Updates the nearest scope that already declares the name; never declares.
    registry.register("let 'name value", |ev, args| {
        let name = args::token("let", 1, &args[0])?;
        let Some(scope) = ev.heap.find_declaring(ev.active_scope(), name) else {
            return Err(EvalError::UndefinedVariable(name.to_string()));
        };
        ev.heap.record_mut(scope).insert(name, args[1].clone());
        Ok(args[1].clone())
    })?;

    // (using (name value)... body): initializers run in the caller's scope,
    // the body in a new child scope holding the bindings.
    registry.register("using '+vars", |ev, args| {
        let operands = args::list("using", 1, &args[0])?;
        let Some((body, bindings)) = operands.split_last() else {
            return Err(EvalError::Arity("`using` needs a body".into()));
        };
        let mut scope = Record::with_parent(ev.active_scope());
        for (name, init) in args::binding_pairs("using", bindings)? {
            let value = ev.eval(init)?;
            scope.insert(name, value);
        }
        let scope = ev.heap.alloc_record(scope);
        ev.with_scope(scope, |ev| ev.eval(body))
    })?;

    Ok(())
}
