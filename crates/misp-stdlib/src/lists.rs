//! List combinators.
//!
//! Every combinator binds its loop variables in one fresh child of the
//! caller's scope and evaluates its `code` operand there. The caller's scope
//! is back in place afterwards, whether the body succeeded or not.

use misp_eval::{args, Evaluator, Registry};
use misp_types::{Atom, EvalResult, RecordId, SetupError};

fn bind(ev: &mut Evaluator, scope: RecordId, name: &str, value: Atom) {
    ev.heap.record_mut(scope).insert(name, value);
}

pub fn register(registry: &mut Registry) -> Result<(), SetupError> {
    registry.register("map 'x list 'code", |ev, args| {
        let name = args::token("map", 1, &args[0])?;
        let items = args::list("map", 2, &args[1])?;
        ev.with_child_scope(|ev, scope| -> EvalResult<Atom> {
            let mut mapped = Vec::with_capacity(items.len());
            for item in items {
                bind(ev, scope, name, item.clone());
                mapped.push(ev.eval(&args[2])?);
            }
            Ok(Atom::list(mapped))
        })
    })?;

    // Generates elements until `next-x` evaluates to nil; `x` starts as nil
    // and always holds the latest generated value.
    registry.register("mapex 'x 'next-x 'code", |ev, args| {
        let name = args::token("mapex", 1, &args[0])?;
        ev.with_child_scope(|ev, scope| -> EvalResult<Atom> {
            bind(ev, scope, name, Atom::nil());
            let mut mapped = Vec::new();
            loop {
                let next = ev.eval(&args[1])?;
                let done = next.is_nil();
                bind(ev, scope, name, next);
                if done {
                    return Ok(Atom::list(mapped));
                }
                mapped.push(ev.eval(&args[2])?);
            }
        })
    })?;

    // `x` is the accumulator, `y` the current element.
    registry.register("fold 'x 'y first-value list 'code", |ev, args| {
        let acc_name = args::token("fold", 1, &args[0])?;
        let item_name = args::token("fold", 2, &args[1])?;
        let items = args::list("fold", 4, &args[3])?;
        ev.with_child_scope(|ev, scope| -> EvalResult<Atom> {
            let mut acc = args[2].clone();
            for item in items {
                bind(ev, scope, acc_name, acc);
                bind(ev, scope, item_name, item.clone());
                acc = ev.eval(&args[4])?;
            }
            Ok(acc)
        })
    })?;

    registry.register("where 'x list 'code", |ev, args| {
        let name = args::token("where", 1, &args[0])?;
        let items = args::list("where", 2, &args[1])?;
        ev.with_child_scope(|ev, scope| -> EvalResult<Atom> {
            let mut kept = Vec::new();
            for item in items {
                bind(ev, scope, name, item.clone());
                if ev.eval(&args[2])?.is_true() {
                    kept.push(item.clone());
                }
            }
            Ok(Atom::list(kept))
        })
    })?;

    // Counts from `from` up to, but not including, `to`; yields the last
    // body value, or nil when the range is empty.
    registry.register("for 'v from to 'code", |ev, args| {
        let name = args::token("for", 1, &args[0])?;
        let from = args::integer("for", 2, &args[1])?;
        let to = args::integer("for", 3, &args[2])?;
        ev.with_child_scope(|ev, scope| -> EvalResult<Atom> {
            let mut last = Atom::nil();
            for i in from..to {
                bind(ev, scope, name, Atom::integer(i));
                last = ev.eval(&args[3])?;
            }
            Ok(last)
        })
    })?;

    Ok(())
}
