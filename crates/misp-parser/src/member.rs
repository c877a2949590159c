//! Left-associative rebuilding of `.` chains.
//!
//! The grammar parses `a.b.c.d` right-recursively as `a.(b.(c.d))`, but
//! field access must read left to right. [`join_member`] re-associates while
//! building, so every parsed chain leans left: `((a.b).c).d`.

use misp_types::{Atom, Modifier};

/// Build `lhs.rhs`, rewriting `x.(y.z)` into `(x.y).z` until the right side
/// is no longer a member expression.
///
/// A modifier on a nested right-hand member (as in `a.:b.c`) belongs to its
/// leftmost segment and moves there.
pub fn join_member(lhs: Atom, rhs: Atom) -> Atom {
    match rhs.as_member() {
        Some(inner) => {
            let middle = carry_modifier(inner.lhs.clone(), rhs.modifier);
            let joined = join_member(lhs, middle);
            join_member(joined, inner.rhs.clone())
        }
        None => Atom::member(lhs, rhs),
    }
}

fn carry_modifier(atom: Atom, modifier: Modifier) -> Atom {
    if atom.modifier == Modifier::None {
        atom.with_modifier(modifier)
    } else {
        atom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(name: &str) -> Atom {
        Atom::token(name)
    }

    #[test]
    fn test_simple_member_unchanged() {
        assert_eq!(
            join_member(tok("a"), tok("b")),
            Atom::member(tok("a"), tok("b"))
        );
    }

    #[test]
    fn test_three_segments_lean_left() {
        let rhs = Atom::member(tok("b"), tok("c"));
        assert_eq!(
            join_member(tok("a"), rhs),
            Atom::member(Atom::member(tok("a"), tok("b")), tok("c"))
        );
    }

    #[test]
    fn test_already_left_leaning_rhs() {
        // b.c.d as produced by an inner parse: (b.c).d
        let rhs = Atom::member(Atom::member(tok("b"), tok("c")), tok("d"));
        let expected = Atom::member(
            Atom::member(Atom::member(tok("a"), tok("b")), tok("c")),
            tok("d"),
        );
        assert_eq!(join_member(tok("a"), rhs), expected);
    }

    #[test]
    fn test_modifier_moves_to_leftmost_segment() {
        let rhs = Atom::member(tok("b"), tok("c")).with_modifier(Modifier::Evaluate);
        let expected = Atom::member(
            Atom::member(tok("a"), tok("b").with_modifier(Modifier::Evaluate)),
            tok("c"),
        );
        assert_eq!(join_member(tok("a"), rhs), expected);
    }
}
