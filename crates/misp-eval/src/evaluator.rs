//! Core atom evaluator.

use std::rc::Rc;

use misp_types::{
    Atom, AtomKind, Convention, EvalError, EvalResult, FunctionId, Heap, Member, Modifier,
    Record, RecordId, Signature,
};
use tracing::trace;

use crate::registry::Registry;

/// An operand after `$` splicing, before conversion for its formal.
enum Actual<'a> {
    /// Written in the call form; evaluated only for evaluated formals.
    Raw(&'a Atom),
    /// Produced by splicing an expanded list; already evaluated.
    Value(Atom),
}

/// The tree-walking evaluator.
///
/// Owns the heap, the builtin registry, and the single active-scope pointer.
/// Scope switches go through [`Evaluator::with_scope`], which restores the
/// previous scope when the closure returns, even on error.
pub struct Evaluator {
    /// Every record and function created so far.
    pub heap: Heap,
    registry: Registry,
    active_scope: RecordId,
    /// Evaluation steps taken.
    pub gas: u64,
    /// Step budget; `None` means unbounded.
    pub gas_limit: Option<u64>,
}

impl Evaluator {
    /// Create an evaluator whose active scope is a fresh, empty record.
    pub fn new(registry: Registry) -> Self {
        let mut heap = Heap::new();
        let root = heap.alloc_record(Record::new());
        Self {
            heap,
            registry,
            active_scope: root,
            gas: 0,
            gas_limit: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn active_scope(&self) -> RecordId {
        self.active_scope
    }

    /// Switch the active scope without a guard.
    ///
    /// Prefer [`Evaluator::with_scope`] for temporary switches.
    pub fn set_active_scope(&mut self, scope: RecordId) {
        self.active_scope = scope;
    }

    /// Allocate a fresh record whose parent is the active scope.
    pub fn child_scope(&mut self) -> RecordId {
        self.heap.alloc_record(Record::with_parent(self.active_scope))
    }

    /// Consume one unit of gas. Returns error if exhausted.
    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        match self.gas_limit {
            Some(limit) if self.gas > limit => Err(EvalError::GasExhausted(limit)),
            _ => Ok(()),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an atom in the active scope.
    pub fn eval(&mut self, atom: &Atom) -> EvalResult<Atom> {
        self.tick()?;
        if atom.modifier == Modifier::Quote {
            return Ok(atom.unmarked());
        }
        match &atom.kind {
            AtomKind::Nil
            | AtomKind::Integer(_)
            | AtomKind::Decimal(_)
            | AtomKind::String(_)
            | AtomKind::Function(_) => Ok(atom.unmarked()),
            AtomKind::Token(name) => self.eval_variable(name),
            AtomKind::List(items) => self.eval_call(items),
            AtomKind::Record(id) => self.eval_record(*id),
            AtomKind::Member(member) => self.eval_member(member),
        }
    }

    /// Evaluate an atom with `scope` temporarily active.
    pub fn eval_in(&mut self, atom: &Atom, scope: RecordId) -> EvalResult<Atom> {
        self.with_scope(scope, |ev| ev.eval(atom))
    }

    fn eval_variable(&self, name: &str) -> EvalResult<Atom> {
        self.heap
            .lookup(self.active_scope, name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    /// A record atom evaluates to a fresh, parentless, non-literal record
    /// holding the evaluated values.
    fn eval_record(&mut self, id: RecordId) -> EvalResult<Atom> {
        let entries: Vec<(Rc<str>, Atom)> = self
            .heap
            .record(id)
            .iter()
            .map(|(name, value)| (Rc::from(name), value.clone()))
            .collect();
        let mut fresh = Record::new();
        for (name, value) in entries {
            let value = self.eval(&value)?;
            fresh.insert(&name, value);
        }
        Ok(Atom::record(self.heap.alloc_record(fresh)))
    }

    // ── Member access ─────────────────────────────────────────────────────

    fn eval_member(&mut self, member: &Member) -> EvalResult<Atom> {
        let target = self.eval(&member.lhs)?;
        let Some(record) = target.as_record() else {
            return Err(EvalError::TypeMismatch(format!(
                "left side of `.` must be a record, found {}",
                target.type_name()
            )));
        };
        let name = self.member_name(&member.rhs)?;
        Ok(self.heap.lookup(record, &name).cloned().unwrap_or_default())
    }

    /// The field named by the right side of `.`: a bare token is read as
    /// text, anything else is evaluated and must produce a token.
    fn member_name(&mut self, rhs: &Atom) -> EvalResult<Rc<str>> {
        if let AtomKind::Token(name) = &rhs.kind {
            if rhs.modifier != Modifier::Evaluate {
                return Ok(Rc::clone(name));
            }
        }
        let computed = self.eval(rhs)?;
        match computed.kind {
            AtomKind::Token(name) => Ok(name),
            _ => Err(EvalError::TypeMismatch(format!(
                "right side of `.` must produce a token, found {}",
                computed.type_name()
            ))),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════

    fn eval_call(&mut self, form: &[Atom]) -> EvalResult<Atom> {
        let Some((head, operands)) = form.split_first() else {
            return Err(EvalError::Runtime("cannot call an empty list".into()));
        };

        let head_name = head.as_token().filter(|_| head.modifier == Modifier::None);
        if let Some(builtin) = head_name.and_then(|name| self.registry.get(name)) {
            trace!(builtin = %builtin.name, operands = operands.len(), "dispatch");
            let args = self.bind(&builtin.name, &builtin.signature, operands)?;
            return (builtin.implementation)(self, args);
        }

        let callee = match (self.eval(head), head_name) {
            (Err(EvalError::UndefinedVariable(_)), Some(name)) => {
                return Err(EvalError::UnknownFunction(name.to_string()));
            }
            (result, _) => result?,
        };
        match callee.kind {
            AtomKind::Function(id) => {
                let label = head_name.unwrap_or("function");
                trace!(function = label, operands = operands.len(), "dispatch");
                self.call_function(id, label, operands)
            }
            _ => Err(EvalError::TypeMismatch(format!(
                "cannot call a {}",
                callee.type_name()
            ))),
        }
    }

    /// Invoke a user function: bind its operands in the caller's scope, then
    /// evaluate its body in a fresh child of its declaration scope.
    pub fn call_function(
        &mut self,
        id: FunctionId,
        label: &str,
        operands: &[Atom],
    ) -> EvalResult<Atom> {
        let function = self.heap.function(id).clone();
        let args = self.bind(label, &function.signature, operands)?;
        let mut frame = Record::with_parent(function.scope);
        for (param, value) in function.signature.params().iter().zip(args) {
            frame.insert(&param.name, value);
        }
        let frame = self.heap.alloc_record(frame);
        self.with_scope(frame, |ev| ev.eval(&function.body))
    }

    // ── Binding ───────────────────────────────────────────────────────────

    /// Match call operands against a signature.
    ///
    /// `$`-marked operands are evaluated and their elements spliced in as
    /// separate actuals. Evaluated formals receive evaluated actuals, quoted
    /// formals receive the raw operand, and a rest formal receives a list.
    pub fn bind(
        &mut self,
        callee: &str,
        signature: &Signature,
        operands: &[Atom],
    ) -> EvalResult<Vec<Atom>> {
        let actuals = self.splice(callee, operands)?;
        let fixed = signature.fixed_count();
        let rest = signature.rest();

        if actuals.len() < fixed {
            let missing = &signature.params()[actuals.len()];
            return Err(EvalError::Arity(format!(
                "`{callee}` is missing argument {} (`{missing}`)",
                actuals.len() + 1
            )));
        }
        match rest {
            None if actuals.len() > fixed => {
                return Err(EvalError::Arity(format!(
                    "`{callee}` takes {fixed} argument{}, got {}",
                    if fixed == 1 { "" } else { "s" },
                    actuals.len()
                )));
            }
            Some(param) => {
                let minimum = param.rest.map_or(0, |r| r.minimum());
                if actuals.len() - fixed < minimum {
                    return Err(EvalError::Arity(format!(
                        "`{callee}` needs at least one argument for `{param}`"
                    )));
                }
            }
            None => {}
        }

        let mut actuals = actuals.into_iter();
        let mut args = Vec::with_capacity(signature.params().len());
        for param in &signature.params()[..fixed] {
            if let Some(actual) = actuals.next() {
                args.push(self.convert(actual, param.convention)?);
            }
        }
        if let Some(param) = rest {
            let collected = actuals
                .map(|actual| self.convert(actual, param.convention))
                .collect::<EvalResult<Vec<_>>>()?;
            args.push(Atom::list(collected));
        }
        Ok(args)
    }

    fn splice<'a>(&mut self, callee: &str, operands: &'a [Atom]) -> EvalResult<Vec<Actual<'a>>> {
        let mut actuals = Vec::with_capacity(operands.len());
        for (i, operand) in operands.iter().enumerate() {
            if operand.modifier != Modifier::Expand {
                actuals.push(Actual::Raw(operand));
                continue;
            }
            let expanded = self.eval(operand)?;
            let Some(items) = expanded.as_list() else {
                return Err(EvalError::argument(
                    callee,
                    i + 1,
                    "list to expand",
                    expanded.type_name(),
                ));
            };
            actuals.extend(items.iter().cloned().map(Actual::Value));
        }
        Ok(actuals)
    }

    fn convert(&mut self, actual: Actual<'_>, convention: Convention) -> EvalResult<Atom> {
        match (actual, convention) {
            (Actual::Raw(atom), Convention::Evaluated) => self.eval(atom),
            (Actual::Raw(atom), Convention::Quoted) => Ok(atom.clone()),
            (Actual::Value(value), _) => Ok(value),
        }
    }
}
