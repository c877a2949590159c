//! The language's equality rule, used by `=`.

use misp_types::{Atom, AtomKind};

/// Value equality for numbers, strings and tokens; element-wise for lists;
/// identity for records and functions. Atoms of different kinds are never
/// equal, so `1` and `1.0` differ. Modifiers are ignored.
pub fn atoms_equal(a: &Atom, b: &Atom) -> bool {
    match (&a.kind, &b.kind) {
        (AtomKind::Nil, AtomKind::Nil) => true,
        (AtomKind::Integer(x), AtomKind::Integer(y)) => x == y,
        (AtomKind::Decimal(x), AtomKind::Decimal(y)) => x == y,
        (AtomKind::String(x), AtomKind::String(y)) => x == y,
        (AtomKind::Token(x), AtomKind::Token(y)) => x == y,
        (AtomKind::List(x), AtomKind::List(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| atoms_equal(a, b))
        }
        (AtomKind::Record(x), AtomKind::Record(y)) => x == y,
        (AtomKind::Function(x), AtomKind::Function(y)) => x == y,
        (AtomKind::Member(x), AtomKind::Member(y)) => {
            atoms_equal(&x.lhs, &y.lhs) && atoms_equal(&x.rhs, &y.rhs)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use misp_types::{Heap, Modifier, Record};

    #[test]
    fn test_numbers_compare_by_kind_and_value() {
        assert!(atoms_equal(&Atom::integer(1), &Atom::integer(1)));
        assert!(!atoms_equal(&Atom::integer(1), &Atom::decimal(1.0)));
        assert!(atoms_equal(&Atom::decimal(0.5), &Atom::decimal(0.5)));
        assert!(!atoms_equal(&Atom::decimal(f32::NAN), &Atom::decimal(f32::NAN)));
    }

    #[test]
    fn test_tokens_ignore_modifiers() {
        let quoted = Atom::token("a").with_modifier(Modifier::Quote);
        assert!(atoms_equal(&quoted, &Atom::token("a")));
        assert!(!atoms_equal(&Atom::token("a"), &Atom::string("a")));
    }

    #[test]
    fn test_lists_elementwise() {
        let a = Atom::list(vec![Atom::integer(1), Atom::token("x")]);
        let b = Atom::list(vec![Atom::integer(1), Atom::token("x")]);
        let c = Atom::list(vec![Atom::integer(1)]);
        assert!(atoms_equal(&a, &b));
        assert!(!atoms_equal(&a, &c));
    }

    #[test]
    fn test_records_by_identity() {
        let mut heap = Heap::new();
        let r1 = heap.alloc_record(Record::new());
        let r2 = heap.alloc_record(Record::new());
        assert!(atoms_equal(&Atom::record(r1), &Atom::record(r1)));
        assert!(!atoms_equal(&Atom::record(r1), &Atom::record(r2)));
    }
}
