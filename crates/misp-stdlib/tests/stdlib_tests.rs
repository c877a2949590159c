//! Standard library packs evaluated on top of the core builtins.

use misp_eval::{register_core, Evaluator, Registry};
use misp_types::{emit, Atom, EvalError, EvalResult, SetupError};
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn evaluator() -> Evaluator {
    let mut registry = Registry::new();
    register_core(&mut registry).expect("core builtins register");
    misp_stdlib::register_all(&mut registry).expect("stdlib registers");
    Evaluator::new(registry)
}

fn run_in(ev: &mut Evaluator, source: &str) -> EvalResult<Atom> {
    let atom = misp_parser::parse(source, &mut ev.heap)?;
    ev.eval(&atom)
}

fn run(source: &str) -> EvalResult<Atom> {
    run_in(&mut evaluator(), source)
}

fn assert_show(source: &str, expected: &str) {
    let mut ev = evaluator();
    let value = run_in(&mut ev, source).unwrap_or_else(|e| panic!("`{source}` failed: {e}"));
    assert_eq!(emit(&value, &ev.heap), expected, "source: {source}");
}

fn assert_trap(source: &str) {
    let result = run(source);
    assert!(
        matches!(result, Err(EvalError::ArithmeticTrap(_))),
        "`{source}` gave {result:?}"
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Setup
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_packs_register_once() {
    let mut registry = Registry::new();
    misp_stdlib::register_all(&mut registry).unwrap();
    assert!(registry.contains("ssubstring"));
    assert_eq!(
        misp_stdlib::math::register(&mut registry),
        Err(SetupError::Duplicate("+".into()))
    );
}

#[test]
fn test_listing_shows_declarations() {
    let mut registry = Registry::new();
    misp_stdlib::lists::register(&mut registry).unwrap();
    let listing = registry.listing();
    assert!(listing.contains("map 'x list 'code\n"), "{listing}");
    assert!(listing.contains("fold 'x 'y first-value list 'code\n"), "{listing}");
}

// ══════════════════════════════════════════════════════════════════════════════
// Math
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_addition() {
    assert_show("(+ 1 2 3)", "6");
    assert_show("(+ 1 2.0)", "3.0");
    assert_show("(+ 0.25 0.25)", "0.5");
    assert!(matches!(run("(+)"), Err(EvalError::Arity(_))));
    assert!(matches!(run("(+ 1 \"2\")"), Err(EvalError::TypeMismatch(_))));
}

#[test]
fn test_binary_operators() {
    assert_show("(- 5 2)", "3");
    assert_show("(- 5 2.5)", "2.5");
    assert_show("(* 3 4)", "12");
    assert_show("(* 1.5 2)", "3.0");
    assert_show("(/ 7 2)", "3");
    assert_show("(/ 7.0 2)", "3.5");
    assert_show("(- 1 (+ 1 1))", "-1");
}

#[test]
fn test_integer_traps() {
    assert_trap("(+ 2147483647 1)");
    assert_trap("(- -2147483648 1)");
    assert_trap("(* 65536 65536)");
    assert_trap("(/ 1 0)");
    assert_trap("(/ -2147483648 -1)");
}

#[test]
fn test_decimal_division_by_zero_is_infinite() {
    let value = run("(/ 1.0 0)").unwrap();
    assert!(value.as_decimal().unwrap().is_infinite());
}

#[test]
fn test_comparisons() {
    assert_show("(< 1 2)", "1");
    assert_show("(< 2 1)", "0");
    assert_show("(> 2.5 2)", "1");
    assert_show("(> 1 1)", "0");
}

// ══════════════════════════════════════════════════════════════════════════════
// List combinators
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_map() {
    assert_show("(map 'x (list 1 2 3) (* x x))", "(1 4 9)");
    assert_show("(map 'x (list) x)", "()");
    assert_show(
        "(map 'x (list 1 2) (map 'y (list 10 20) (+ x y)))",
        "((11 21) (12 22))",
    );
}

#[test]
fn test_mapex_generates_until_nil() {
    assert_show(
        "(mapex 'x (? (= x nil) 1 (? (< x 3) (+ x 1) nil)) (* x 10))",
        "(10 20 30)",
    );
    assert_show("(mapex 'x nil x)", "()");
}

#[test]
fn test_fold() {
    assert_show("(fold 'acc 'y 0 (list 1 2 3 4) (+ acc y))", "10");
    assert_show("(fold 'a 'b 'start (list) a)", "start");
    assert_show(
        "(fold 'acc 'y (list) (list 1 2 3) (list y $acc))",
        "(3 2 1)",
    );
}

#[test]
fn test_where() {
    assert_show("(where 'x (list 1 2 3 4 5) (> x 2))", "(3 4 5)");
    assert_show("(where 'x (list 1 2) 'nope)", "()");
}

#[test]
fn test_for() {
    assert_show("(for 'i 0 4 i)", "3");
    assert_show("(for 'i 3 3 i)", "nil");
    assert_show(
        "(using (total 0) (last (for 'i 1 5 (let total (+ total i))) total))",
        "10",
    );
}

#[test]
fn test_loop_variables_do_not_leak() {
    assert_eq!(
        run("(last (map 'x (list 1) x) x)"),
        Err(EvalError::UndefinedVariable("x".into()))
    );
}

#[test]
fn test_scope_restored_when_body_fails() {
    let mut ev = evaluator();
    let root = ev.active_scope();
    for source in [
        "(map 'x (list 1) (undefined))",
        "(fold 'a 'b 0 (list 1) (undefined))",
        "(where 'x (list 1) (undefined))",
        "(for 'i 0 1 (undefined))",
        "(mapex 'x (undefined) x)",
    ] {
        assert!(run_in(&mut ev, source).is_err(), "{source}");
        assert_eq!(ev.active_scope(), root, "{source}");
    }
}

#[test]
fn test_loop_variable_must_be_token() {
    assert!(matches!(
        run("(map \"x\" (list 1) 1)"),
        Err(EvalError::TypeMismatch(_))
    ));
}

// ══════════════════════════════════════════════════════════════════════════════
// Strings
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_string_functions() {
    assert_show("(slength \"héllo\")", "5");
    assert_show("(sindex \"abc\" 1)", "98");
    assert_eq!(run("(to-char 65)"), Ok(Atom::string("A")));
    assert_eq!(run("(ssubstring \"hello world\" 6 5)"), Ok(Atom::string("world")));
    assert_eq!(run("(ssubstring \"hello\" -2 4)"), Ok(Atom::string("he")));
    assert_eq!(run("(ssubstring \"hello\" 9 1)"), Ok(Atom::string("")));
}

#[test]
fn test_string_function_errors() {
    assert_trap("(sindex \"abc\" 3)");
    assert!(matches!(run("(to-char -1)"), Err(EvalError::TypeMismatch(_))));
    assert!(matches!(run("(slength 'abc)"), Err(EvalError::TypeMismatch(_))));
}

#[test]
fn test_char_codes_round_trip() {
    assert_eq!(
        run("(map 'i (list 0 1 2) (to-char (sindex \"xyz\" i)))")
            .unwrap()
            .as_list()
            .map(<[Atom]>::to_vec),
        Some(vec![Atom::string("x"), Atom::string("y"), Atom::string("z")])
    );
}
