//! Parser tests: atoms, lists, records, modifiers, member chains, errors.

use misp_parser::parse;
use misp_types::{emit, Atom, AtomKind, Heap, Modifier};
use pretty_assertions::assert_eq;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Parse into a fresh heap, panicking on error.
fn parse_ok(source: &str) -> (Atom, Heap) {
    let mut heap = Heap::new();
    match parse(source, &mut heap) {
        Ok(atom) => (atom, heap),
        Err(e) => panic!("unexpected parse error in {source:?}: {e}"),
    }
}

/// Parse and re-emit; the emitter is the canonical textual form.
fn roundtrip(source: &str) -> String {
    let (atom, heap) = parse_ok(source);
    emit(&atom, &heap)
}

/// Parse and return the error message.
fn parse_err(source: &str) -> String {
    let mut heap = Heap::new();
    match parse(source, &mut heap) {
        Ok(atom) => panic!("expected a parse error for {source:?}, got {atom:?}"),
        Err(e) => e.message,
    }
}

fn tok(name: &str) -> Atom {
    Atom::token(name)
}

// ─────────────────────────────────────────────────────────────────────
// Leaves
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_leaf_atoms() {
    assert_eq!(parse_ok("42").0, Atom::integer(42));
    assert_eq!(parse_ok("-3").0, Atom::integer(-3));
    assert_eq!(parse_ok("1.5").0, Atom::decimal(1.5));
    assert_eq!(parse_ok("\"hi\"").0, Atom::string("hi"));
    assert_eq!(parse_ok("abc").0, tok("abc"));
    assert_eq!(parse_ok("nil").0, Atom::nil());
}

#[test]
fn test_minus_is_both_sign_and_name() {
    assert_eq!(
        parse_ok("(- 5 -2)").0,
        Atom::list(vec![tok("-"), Atom::integer(5), Atom::integer(-2)])
    );
    assert_eq!(
        parse_ok("'-").0,
        tok("-").with_modifier(Modifier::Quote)
    );
}

// ─────────────────────────────────────────────────────────────────────
// Lists
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_nested_lists() {
    assert_eq!(roundtrip("(a (b c) ())"), "(a (b c) ())");
    assert_eq!(roundtrip("(  a\n\t b  )"), "(a b)");
}

#[test]
fn test_comments_inside_lists() {
    let source = "(list ; first\n 1 ; second\n 2)";
    assert_eq!(roundtrip(source), "(list 1 2)");
}

#[test]
fn test_unterminated_list() {
    assert_eq!(parse_err("(a (b)"), "Unterminated list");
}

// ─────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_record_literal_is_flagged_literal() {
    let (atom, heap) = parse_ok("[(x 1)]");
    let AtomKind::Record(id) = atom.kind else {
        panic!("expected record, got {atom:?}");
    };
    let record = heap.record(id);
    assert!(record.literal);
    assert_eq!(record.parent, None);
    assert_eq!(record.len(), 1);
    assert_eq!(record.get("x"), Some(&Atom::integer(1)));
}

#[test]
fn test_record_keys_may_be_strings() {
    let (atom, heap) = parse_ok("[(\"x\" 1) (y (+ 1 2))]");
    let id = atom.as_record().unwrap();
    assert_eq!(heap.record(id).get("x"), Some(&Atom::integer(1)));
    // values are kept unevaluated
    assert_eq!(emit(heap.record(id).get("y").unwrap(), &heap), "(+ 1 2)");
}

#[test]
fn test_record_preserves_order_and_upserts() {
    assert_eq!(roundtrip("[(b 1)(a 2)(b 3)]"), "[(b 3)(a 2)]");
}

#[test]
fn test_malformed_records() {
    assert_eq!(parse_err("[x]"), "Expected list inside record");
    assert!(parse_err("[(x 1 2)]").starts_with("Malformed record"));
    assert!(parse_err("[(1 2)]").starts_with("Malformed record"));
    assert_eq!(parse_err("[(x 1)"), "Unterminated record");
}

// ─────────────────────────────────────────────────────────────────────
// Modifiers
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_modifiers_on_tokens_and_lists() {
    assert_eq!(parse_ok("'x").0, tok("x").with_modifier(Modifier::Quote));
    assert_eq!(parse_ok("$xs").0, tok("xs").with_modifier(Modifier::Expand));
    assert_eq!(parse_ok(":k").0, tok("k").with_modifier(Modifier::Evaluate));
    assert_eq!(roundtrip("'(1 2)"), "'(1 2)");
}

#[test]
fn test_modifiers_rejected_on_literals() {
    assert_eq!(parse_err("'5"), "Modifiers not allowed on literals");
    assert_eq!(parse_err("$\"s\""), "Modifiers not allowed on literals");
    assert_eq!(parse_err(":-1.5"), "Modifiers not allowed on literals");
    assert_eq!(parse_err("'[(x 1)]"), "Modifiers not allowed on record");
}

// ─────────────────────────────────────────────────────────────────────
// Member chains
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_member_chain_leans_left() {
    let (atom, _) = parse_ok("a.b.c.d");
    let expected = Atom::member(
        Atom::member(Atom::member(tok("a"), tok("b")), tok("c")),
        tok("d"),
    );
    assert_eq!(atom, expected);
}

#[test]
fn test_quoted_member_chain() {
    let (atom, _) = parse_ok("'a.b.c");
    assert_eq!(atom.modifier, Modifier::Quote);
    let member = atom.as_member().unwrap();
    assert_eq!(member.rhs, tok("c"));
    assert_eq!(member.lhs, Atom::member(tok("a"), tok("b")));
}

#[test]
fn test_computed_member_segment() {
    let (atom, _) = parse_ok("r.:k");
    assert_eq!(
        atom,
        Atom::member(tok("r"), tok("k").with_modifier(Modifier::Evaluate))
    );
}

#[test]
fn test_member_on_list_and_number() {
    assert_eq!(roundtrip("(get-r).x"), "(get-r).x");
    assert_eq!(
        parse_ok("5.x").0,
        Atom::member(Atom::integer(5), tok("x"))
    );
}

#[test]
fn test_expand_on_member_rhs_rejected() {
    assert_eq!(parse_err("a.$b"), "Modifier illegal in this context");
}

// ─────────────────────────────────────────────────────────────────────
// Whole-input rules
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_leftover_input_rejected() {
    assert_eq!(parse_err("1 2"), "Did not consume all input");
    assert_eq!(parse_err("(a))"), "Did not consume all input");
}

#[test]
fn test_empty_input_rejected() {
    assert_eq!(parse_err(""), "Unexpected end of input");
    assert_eq!(parse_err("  ; nothing here"), "Unexpected end of input");
}

#[test]
fn test_stray_closer_rejected() {
    assert_eq!(parse_err(")"), "Unexpected ')'");
}

#[test]
fn test_error_position_is_line_and_column() {
    let mut heap = Heap::new();
    let err = parse("(list\n  \"bad\\q\")", &mut heap).unwrap_err();
    assert_eq!(err.position.line, 2);
    assert_eq!(err.position.column, 8);
    assert_eq!(err.source_line, "  \"bad\\q\")");
}
