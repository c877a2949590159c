//! Human-readable rendering of atoms.
//!
//! Output is for reading, not for reloading. Functions lose their captured
//! scopes, revisited records print a placeholder, and some values have no
//! source form at all: a string holding `"`, a non-finite decimal, or a
//! token built with `stot` that would not scan back. The serializer checks
//! for those before it reuses this text. Each top-level
//! [`emit`] call is one print pass: a record already printed during the pass
//! renders as [`CIRCULAR_REFERENCE`] instead of being walked again, so cyclic
//! graphs always terminate.

use std::fmt::Write;

use rustc_hash::FxHashSet;

use crate::atom::{Atom, AtomKind};
use crate::heap::{Heap, RecordId};

/// Stand-in printed for a record already visited in the current pass.
pub const CIRCULAR_REFERENCE: &str = "<circular reference>";

/// State of one print traversal.
#[derive(Debug, Default)]
pub struct PrintPass {
    visited: FxHashSet<RecordId>,
}

impl PrintPass {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Render an atom in a fresh print pass.
pub fn emit(atom: &Atom, heap: &Heap) -> String {
    let mut out = String::new();
    emit_into(atom, heap, &mut out, &mut PrintPass::new());
    out
}

/// Render an atom into `out`, sharing `pass` with earlier renders.
pub fn emit_into(atom: &Atom, heap: &Heap, out: &mut String, pass: &mut PrintPass) {
    if let Some(prefix) = atom.modifier.prefix() {
        out.push(prefix);
    }
    match &atom.kind {
        AtomKind::Nil => out.push_str("nil"),
        AtomKind::Integer(v) => {
            let _ = write!(out, "{v}");
        }
        AtomKind::Decimal(v) => out.push_str(&format_decimal(*v)),
        AtomKind::String(s) => out.push_str(&quote_string(s)),
        AtomKind::Token(t) => out.push_str(t),
        AtomKind::List(items) => {
            out.push('(');
            emit_sequence(items, heap, out, pass);
            out.push(')');
        }
        AtomKind::Record(id) => {
            if !pass.visited.insert(*id) {
                out.push_str(CIRCULAR_REFERENCE);
                return;
            }
            out.push('[');
            for (name, value) in heap.record(*id).iter() {
                out.push('(');
                out.push_str(name);
                out.push(' ');
                emit_into(value, heap, out, pass);
                out.push(')');
            }
            out.push(']');
        }
        AtomKind::Function(id) => {
            let function = heap.function(*id);
            out.push_str("(func (");
            emit_sequence(&function.signature.to_atoms(), heap, out, pass);
            out.push_str(") ");
            emit_into(&function.body, heap, out, pass);
            out.push(')');
        }
        AtomKind::Member(member) => {
            emit_into(&member.lhs, heap, out, pass);
            out.push('.');
            emit_into(&member.rhs, heap, out, pass);
        }
    }
}

fn emit_sequence(items: &[Atom], heap: &Heap, out: &mut String, pass: &mut PrintPass) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        emit_into(item, heap, out, pass);
    }
}

/// Decimal text that always re-lexes as a decimal (`3` prints as `3.0`).
pub fn format_decimal(value: f32) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// Quote a string, escaping the two sequences the lexer understands.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Modifier;
    use crate::heap::{Function, Record};
    use crate::signature::Signature;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_leaves() {
        let heap = Heap::new();
        assert_eq!(emit(&Atom::nil(), &heap), "nil");
        assert_eq!(emit(&Atom::integer(-4), &heap), "-4");
        assert_eq!(emit(&Atom::decimal(3.0), &heap), "3.0");
        assert_eq!(emit(&Atom::decimal(-0.25), &heap), "-0.25");
        assert_eq!(emit(&Atom::string("a\\b\nc"), &heap), r#""a\\b\nc""#);
        assert_eq!(emit(&Atom::token("x").with_modifier(Modifier::Quote), &heap), "'x");
    }

    #[test]
    fn test_emit_list_and_member() {
        let heap = Heap::new();
        let list = Atom::list(vec![
            Atom::token("+"),
            Atom::integer(1),
            Atom::token("xs").with_modifier(Modifier::Expand),
        ]);
        assert_eq!(emit(&list, &heap), "(+ 1 $xs)");

        let chain = Atom::member(
            Atom::member(Atom::token("a"), Atom::token("b")),
            Atom::token("c").with_modifier(Modifier::Evaluate),
        );
        assert_eq!(emit(&chain, &heap), "a.b.:c");
    }

    #[test]
    fn test_emit_record_in_insertion_order() {
        let mut heap = Heap::new();
        let mut r = Record::new();
        r.insert("y", Atom::integer(2));
        r.insert("x", Atom::string("s"));
        let id = heap.alloc_record(r);
        assert_eq!(emit(&Atom::record(id), &heap), r#"[(y 2)(x "s")]"#);
    }

    #[test]
    fn test_emit_self_referencing_record_terminates() {
        let mut heap = Heap::new();
        let id = heap.alloc_record(Record::new());
        heap.record_mut(id).insert("me", Atom::record(id));
        assert_eq!(
            emit(&Atom::record(id), &heap),
            "[(me <circular reference>)]"
        );
    }

    #[test]
    fn test_each_emit_call_is_a_new_pass() {
        let mut heap = Heap::new();
        let id = heap.alloc_record(Record::new());
        let atom = Atom::record(id);
        assert_eq!(emit(&atom, &heap), "[]");
        assert_eq!(emit(&atom, &heap), "[]");

        let mut pass = PrintPass::new();
        let mut out = String::new();
        emit_into(&atom, &heap, &mut out, &mut pass);
        emit_into(&atom, &heap, &mut out, &mut pass);
        assert_eq!(out, format!("[]{CIRCULAR_REFERENCE}"));
    }

    #[test]
    fn test_emit_function() {
        let mut heap = Heap::new();
        let scope = heap.alloc_record(Record::new());
        let signature = Signature::from_formals(&[
            Atom::token("a"),
            Atom::token("*rest").with_modifier(Modifier::Quote),
        ])
        .unwrap();
        let body = Atom::list(vec![Atom::token("last"), Atom::token("a")]);
        let id = heap.alloc_function(Function {
            signature,
            body,
            scope,
        });
        assert_eq!(emit(&Atom::function(id), &heap), "(func (a '*rest) (last a))");
    }
}
