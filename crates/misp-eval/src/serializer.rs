//! Persistence of a live record graph as loadable MISP source.
//!
//! Serialization runs in two phases. A depth-first reachability walk from
//! the root numbers every live record and function it meets. Emission then
//! writes a program that pre-allocates that many placeholders, recreates the
//! functions, re-links their declaration scopes, fills every record by index
//! and re-links parents, and finally evaluates to placeholder 0:
//!
//! ```text
//! (using
//!   (atoms (array 2 []))
//!   (funcs (list
//!     (func (x) (+ x 1))
//!   ))
//!   (last
//!     (set-decl-scope (index-get funcs 0) (index-get atoms 0))
//!     (multi-set (index-get atoms 0) (inc (index-get funcs 0)) (child (index-get atoms 1)))
//!     (multi-set (index-get atoms 1) (name "c"))
//!     (set-parent (index-get atoms 1) (index-get atoms 0))
//!     (index-get atoms 0)
//!   )
//! )
//! ```
//!
//! Records and functions are always referenced by index, so shared and
//! cyclic structure survives the round trip. Literal records are not part
//! of the graph: the walk skips them and emission writes them inline.
//!
//! Tokens that would not scan back as themselves are rebuilt with `stot`.
//! Strings containing `"` and non-finite decimals have no source form, so
//! serializing a graph that holds one fails instead of writing a file that
//! cannot be loaded.

use std::fmt::Write;

use misp_types::emit::{format_decimal, quote_string};
use misp_types::{emit, Atom, AtomKind, EvalError, EvalResult, FunctionId, Heap, RecordId};
use rustc_hash::FxHashMap;

/// Serialize the graph reachable from `root`.
#[tracing::instrument(level = "debug", skip(heap))]
pub fn serialize(heap: &Heap, root: RecordId) -> EvalResult<String> {
    if heap.record(root).literal {
        return Err(EvalError::Runtime(
            "cannot serialize a literal record".into(),
        ));
    }
    let mut serializer = Serializer::new(heap);
    serializer.walk(Atom::record(root));
    tracing::debug!(
        records = serializer.records.len(),
        functions = serializer.functions.len(),
        "reachability walk complete"
    );
    serializer.emit_program()
}

struct Serializer<'h> {
    heap: &'h Heap,
    records: Vec<RecordId>,
    record_index: FxHashMap<RecordId, usize>,
    functions: Vec<FunctionId>,
    function_index: FxHashMap<FunctionId, usize>,
}

impl<'h> Serializer<'h> {
    fn new(heap: &'h Heap) -> Self {
        Self {
            heap,
            records: Vec::new(),
            record_index: FxHashMap::default(),
            functions: Vec::new(),
            function_index: FxHashMap::default(),
        }
    }

    // ── Phase 1: reachability ─────────────────────────────────────────────

    /// Number records and functions in depth-first preorder: a record's
    /// values, then its parent; a function's scope, then its body. Quoted
    /// lists are inert and not searched.
    fn walk(&mut self, root: Atom) {
        let mut stack = vec![root];
        while let Some(atom) = stack.pop() {
            match &atom.kind {
                AtomKind::Nil
                | AtomKind::Integer(_)
                | AtomKind::Decimal(_)
                | AtomKind::String(_)
                | AtomKind::Token(_) => {}
                AtomKind::List(items) => {
                    if !atom.is_quoted() {
                        stack.extend(items.iter().rev().cloned());
                    }
                }
                AtomKind::Member(member) => {
                    stack.push(member.rhs.clone());
                    stack.push(member.lhs.clone());
                }
                AtomKind::Record(id) => {
                    let record = self.heap.record(*id);
                    if record.literal || self.record_index.contains_key(id) {
                        continue;
                    }
                    self.record_index.insert(*id, self.records.len());
                    self.records.push(*id);
                    if let Some(parent) = record.parent {
                        stack.push(Atom::record(parent));
                    }
                    let values: Vec<Atom> = record.iter().map(|(_, v)| v.clone()).collect();
                    stack.extend(values.into_iter().rev());
                }
                AtomKind::Function(id) => {
                    if self.function_index.contains_key(id) {
                        continue;
                    }
                    self.function_index.insert(*id, self.functions.len());
                    self.functions.push(*id);
                    let function = self.heap.function(*id);
                    stack.push(function.body.clone());
                    stack.push(Atom::record(function.scope));
                }
            }
        }
    }

    // ── Phase 2: emission ─────────────────────────────────────────────────

    fn emit_program(&self) -> EvalResult<String> {
        let mut out = String::new();
        let _ = writeln!(out, "(using");
        let _ = writeln!(out, "  (atoms (array {} []))", self.records.len());
        let _ = writeln!(out, "  (funcs (list");
        for &id in &self.functions {
            let function = self.heap.function(id);
            let params: Vec<String> = function
                .signature
                .to_atoms()
                .iter()
                .map(|p| emit(p, self.heap))
                .collect();
            let _ = writeln!(
                out,
                "    (func ({}) {})",
                params.join(" "),
                emit(&function.body, self.heap)
            );
        }
        let _ = writeln!(out, "  ))");
        let _ = writeln!(out, "  (last");

        for (i, &id) in self.functions.iter().enumerate() {
            let scope = self.heap.function(id).scope;
            if let Some(j) = self.record_index.get(&scope) {
                let _ = writeln!(
                    out,
                    "    (set-decl-scope (index-get funcs {i}) (index-get atoms {j}))"
                );
            }
        }

        for (i, &id) in self.records.iter().enumerate() {
            let record = self.heap.record(id);
            let _ = write!(out, "    (multi-set (index-get atoms {i})");
            for (name, value) in record.iter() {
                out.push(' ');
                out.push('(');
                out.push_str(&self.field_name(name)?);
                out.push(' ');
                self.value(value, &mut out)?;
                out.push(')');
            }
            out.push_str(")\n");
            if let Some(j) = record.parent.and_then(|p| self.record_index.get(&p)) {
                let _ = writeln!(
                    out,
                    "    (set-parent (index-get atoms {i}) (index-get atoms {j}))"
                );
            }
        }

        let _ = writeln!(out, "    (index-get atoms 0)");
        let _ = writeln!(out, "  )");
        out.push(')');
        Ok(out)
    }

    /// A field name as `multi-set` reads it back: bare when it lexes as a
    /// token, quoted as a string otherwise.
    fn field_name(&self, name: &str) -> EvalResult<String> {
        if lexes_as_token(name) {
            Ok(name.to_string())
        } else {
            string_literal(name)
        }
    }

    /// Write a value as an expression that evaluates back to it.
    fn value(&self, atom: &Atom, out: &mut String) -> EvalResult<()> {
        match &atom.kind {
            AtomKind::Nil => out.push_str("nil"),
            AtomKind::Integer(v) => {
                let _ = write!(out, "{v}");
            }
            AtomKind::Decimal(v) => out.push_str(&decimal_literal(*v)?),
            AtomKind::String(s) => out.push_str(&string_literal(s)?),
            AtomKind::Token(t) => {
                if lexes_as_token(t) {
                    out.push('\'');
                    out.push_str(t);
                } else {
                    let _ = write!(out, "(stot {})", string_literal(t)?);
                }
            }
            AtomKind::List(items) => {
                if !items.iter().any(|item| self.holds_live(item)) && self.verbatim(atom) {
                    out.push('\'');
                    out.push_str(&emit(&atom.unmarked(), self.heap));
                } else {
                    out.push_str("(list");
                    for item in items.iter() {
                        out.push(' ');
                        self.value(item, out)?;
                    }
                    out.push(')');
                }
            }
            AtomKind::Record(id) => match self.record_index.get(id) {
                Some(i) => {
                    let _ = write!(out, "(index-get atoms {i})");
                }
                None if self.verbatim(atom) => out.push_str(&emit(&atom.unmarked(), self.heap)),
                None => {
                    return Err(EvalError::Runtime(
                        "cannot serialize a literal record with unwritable contents".into(),
                    ))
                }
            },
            AtomKind::Function(id) => match self.function_index.get(id) {
                Some(i) => {
                    let _ = write!(out, "(index-get funcs {i})");
                }
                None => out.push_str("nil"),
            },
            AtomKind::Member(_) => {
                if !self.verbatim(atom) {
                    return Err(EvalError::Runtime(
                        "cannot serialize a member expression with unwritable parts".into(),
                    ));
                }
                out.push('\'');
                out.push_str(&emit(&atom.unmarked(), self.heap));
            }
        }
        Ok(())
    }

    /// Whether the emitted text of `atom` parses back to the same atom.
    fn verbatim(&self, atom: &Atom) -> bool {
        match &atom.kind {
            AtomKind::Nil | AtomKind::Integer(_) => true,
            AtomKind::Decimal(v) => v.is_finite(),
            AtomKind::String(s) => !s.contains('"'),
            AtomKind::Token(t) => lexes_as_token(t),
            AtomKind::List(items) => items.iter().all(|item| self.verbatim(item)),
            AtomKind::Member(member) => self.verbatim(&member.lhs) && self.verbatim(&member.rhs),
            AtomKind::Record(id) => {
                let record = self.heap.record(*id);
                record.literal
                    && record
                        .iter()
                        .all(|(name, value)| lexes_as_token(name) && self.verbatim(value))
            }
            AtomKind::Function(_) => false,
        }
    }

    /// Whether `atom` is, or contains, a numbered record or function.
    fn holds_live(&self, atom: &Atom) -> bool {
        match &atom.kind {
            AtomKind::Record(id) => self.record_index.contains_key(id),
            AtomKind::Function(_) => true,
            AtomKind::List(items) => items.iter().any(|item| self.holds_live(item)),
            AtomKind::Member(member) => self.holds_live(&member.lhs) || self.holds_live(&member.rhs),
            _ => false,
        }
    }
}

/// A quoted string, or an error when the text holds a `"` the lexer cannot escape.
fn string_literal(text: &str) -> EvalResult<String> {
    if text.contains('"') {
        return Err(EvalError::Runtime(format!(
            "cannot serialize text containing a double quote: {text:?}"
        )));
    }
    Ok(quote_string(text))
}

fn decimal_literal(value: f32) -> EvalResult<String> {
    if !value.is_finite() {
        return Err(EvalError::Runtime(format!(
            "cannot serialize the non-finite decimal {value}"
        )));
    }
    Ok(format_decimal(value))
}

/// Whether `name` would lex back as exactly this token.
fn lexes_as_token(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let starts_number = first.is_ascii_digit()
        || (first == '-' && chars.next().is_some_and(|c| c.is_ascii_digit()));
    !starts_number
        && name != "nil"
        && !matches!(first, '\'' | '$' | ':' | '"' | '[' | ']' | ';')
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '.' | '(' | ')'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexes_as_token() {
        assert!(lexes_as_token("x"));
        assert!(lexes_as_token("set-parent"));
        assert!(lexes_as_token("-"));
        assert!(!lexes_as_token("-1"));
        assert!(!lexes_as_token("a b"));
        assert!(!lexes_as_token("a.b"));
        assert!(!lexes_as_token("nil"));
        assert!(!lexes_as_token(""));
        assert!(!lexes_as_token("'q"));
    }

    #[test]
    fn test_literal_root_rejected() {
        let mut heap = Heap::new();
        let id = heap.alloc_record(misp_types::Record::literal());
        assert!(serialize(&heap, id).is_err());
    }

    #[test]
    fn test_empty_root() {
        let mut heap = Heap::new();
        let id = heap.alloc_record(misp_types::Record::new());
        let text = serialize(&heap, id).unwrap();
        assert!(text.starts_with("(using\n  (atoms (array 1 []))"));
        assert!(text.contains("    (multi-set (index-get atoms 0))\n"));
        assert!(text.ends_with("    (index-get atoms 0)\n  )\n)"));
    }
}
