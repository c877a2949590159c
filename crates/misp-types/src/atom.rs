//! The atom model: every value and expression node of the language.
//!
//! Atoms are a closed tagged union. Leaf kinds are stored inline; lists and
//! member expressions are reference-counted so cloning an atom (which the
//! evaluator does constantly) never deep-copies program text. Records and
//! functions live in the [`Heap`](crate::Heap) and are referenced by handle,
//! which lets parent chains and closures form cycles freely.

use std::rc::Rc;

use crate::heap::{FunctionId, RecordId};

/// Evaluation treatment attached to an atom by its prefix character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    #[default]
    None,
    /// `'` — the atom is read literally.
    Quote,
    /// `$` — a list operand is spliced into positional arguments.
    Expand,
    /// `:` — forces computed evaluation where the atom would be read literally.
    Evaluate,
}

impl Modifier {
    /// Map a prefix character to its modifier.
    pub fn from_prefix(ch: char) -> Option<Self> {
        match ch {
            '\'' => Some(Self::Quote),
            '$' => Some(Self::Expand),
            ':' => Some(Self::Evaluate),
            _ => None,
        }
    }

    /// The prefix character that produces this modifier.
    pub fn prefix(self) -> Option<char> {
        match self {
            Self::None => None,
            Self::Quote => Some('\''),
            Self::Expand => Some('$'),
            Self::Evaluate => Some(':'),
        }
    }
}

/// A deferred field access `lhs.rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub lhs: Atom,
    pub rhs: Atom,
}

/// The kind-specific payload of an [`Atom`].
#[derive(Debug, Clone, PartialEq)]
pub enum AtomKind {
    Nil,
    Integer(i32),
    Decimal(f32),
    String(Rc<str>),
    /// An identifier; also a first-class symbol value.
    Token(Rc<str>),
    /// Literal data when quoted, a call form otherwise.
    List(Rc<[Atom]>),
    Record(RecordId),
    Function(FunctionId),
    Member(Rc<Member>),
}

/// A value or expression node plus its [`Modifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub kind: AtomKind,
    pub modifier: Modifier,
}

impl Default for Atom {
    fn default() -> Self {
        Self::nil()
    }
}

impl From<AtomKind> for Atom {
    fn from(kind: AtomKind) -> Self {
        Self {
            kind,
            modifier: Modifier::None,
        }
    }
}

impl Atom {
    // ── Constructors ──────────────────────────────────────────────────────

    pub fn nil() -> Self {
        AtomKind::Nil.into()
    }

    pub fn integer(value: i32) -> Self {
        AtomKind::Integer(value).into()
    }

    pub fn decimal(value: f32) -> Self {
        AtomKind::Decimal(value).into()
    }

    pub fn string(value: impl Into<Rc<str>>) -> Self {
        AtomKind::String(value.into()).into()
    }

    pub fn token(name: impl Into<Rc<str>>) -> Self {
        AtomKind::Token(name.into()).into()
    }

    pub fn list(items: impl Into<Rc<[Atom]>>) -> Self {
        AtomKind::List(items.into()).into()
    }

    pub fn record(id: RecordId) -> Self {
        AtomKind::Record(id).into()
    }

    pub fn function(id: FunctionId) -> Self {
        AtomKind::Function(id).into()
    }

    pub fn member(lhs: Atom, rhs: Atom) -> Self {
        AtomKind::Member(Rc::new(Member { lhs, rhs })).into()
    }

    /// Integer 1 or 0, the language's boolean encoding.
    pub fn boolean(value: bool) -> Self {
        Self::integer(i32::from(value))
    }

    // ── Modifiers ─────────────────────────────────────────────────────────

    /// Replace the modifier.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Shallow copy with the modifier cleared.
    pub fn unmarked(&self) -> Self {
        self.clone().with_modifier(Modifier::None)
    }

    pub fn is_quoted(&self) -> bool {
        self.modifier == Modifier::Quote
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Lower-case kind name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            AtomKind::Nil => "nil",
            AtomKind::Integer(_) => "integer",
            AtomKind::Decimal(_) => "decimal",
            AtomKind::String(_) => "string",
            AtomKind::Token(_) => "token",
            AtomKind::List(_) => "list",
            AtomKind::Record(_) => "record",
            AtomKind::Function(_) => "function",
            AtomKind::Member(_) => "member",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.kind, AtomKind::Nil)
    }

    /// Conditionals treat a non-zero integer as true and everything else as false.
    pub fn is_true(&self) -> bool {
        matches!(self.kind, AtomKind::Integer(v) if v != 0)
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self.kind {
            AtomKind::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f32> {
        match self.kind {
            AtomKind::Decimal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            AtomKind::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&str> {
        match &self.kind {
            AtomKind::Token(t) => Some(&**t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Atom]> {
        match &self.kind {
            AtomKind::List(items) => Some(&**items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<RecordId> {
        match self.kind {
            AtomKind::Record(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<FunctionId> {
        match self.kind {
            AtomKind::Function(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_member(&self) -> Option<&Member> {
        match &self.kind {
            AtomKind::Member(m) => Some(&**m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_prefix_round_trip() {
        for m in [Modifier::Quote, Modifier::Expand, Modifier::Evaluate] {
            let ch = m.prefix().unwrap();
            assert_eq!(Modifier::from_prefix(ch), Some(m));
        }
        assert_eq!(Modifier::None.prefix(), None);
        assert_eq!(Modifier::from_prefix('#'), None);
    }

    #[test]
    fn test_unmarked_clears_modifier_only() {
        let quoted = Atom::token("x").with_modifier(Modifier::Quote);
        assert!(quoted.is_quoted());
        let plain = quoted.unmarked();
        assert_eq!(plain.modifier, Modifier::None);
        assert_eq!(plain.as_token(), Some("x"));
    }

    #[test]
    fn test_truthiness() {
        assert!(Atom::integer(1).is_true());
        assert!(Atom::integer(-3).is_true());
        assert!(!Atom::integer(0).is_true());
        assert!(!Atom::nil().is_true());
        assert!(!Atom::string("1").is_true());
    }

    #[test]
    fn test_list_clone_shares_storage() {
        let list = Atom::list(vec![Atom::integer(1), Atom::integer(2)]);
        let copy = list.clone();
        match (&list.kind, &copy.kind) {
            (AtomKind::List(a), AtomKind::List(b)) => assert!(Rc::ptr_eq(a, b)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Atom::nil().type_name(), "nil");
        assert_eq!(Atom::decimal(1.5).type_name(), "decimal");
        assert_eq!(Atom::member(Atom::token("a"), Atom::token("b")).type_name(), "member");
        assert_eq!(Atom::boolean(true), Atom::integer(1));
    }
}
