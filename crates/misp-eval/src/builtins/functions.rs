//! Closure creation and re-linking.

use misp_types::{Atom, EvalError, Function, SetupError, Signature};

use crate::args;
use crate::registry::Registry;

pub(super) fn register(registry: &mut Registry) -> Result<(), SetupError> {
    // Formals follow the builtin declaration grammar, so user functions can
    // take quoted and rest parameters too.
    registry.register("func 'args 'body", |ev, args| {
        let formals = args::list("func", 1, &args[0])?;
        let signature = Signature::from_formals(formals)
            .map_err(|reason| EvalError::TypeMismatch(format!("malformed argument list in `func`: {reason}")))?;
        let id = ev.heap.alloc_function(Function {
            signature,
            body: args[1].clone(),
            scope: ev.active_scope(),
        });
        Ok(Atom::function(id))
    })?;

    registry.register("set-decl-scope func scope", |ev, args| {
        let function = args::function("set-decl-scope", 1, &args[0])?;
        let scope = args::record("set-decl-scope", 2, &args[1])?;
        ev.heap.function_mut(function).scope = scope;
        Ok(args[0].clone())
    })?;

    Ok(())
}
