//! Arithmetic and numeric comparison.
//!
//! Integer operands stay integers and use checked arithmetic; a single
//! decimal operand promotes the whole operation to `f32`.

use misp_eval::args::{self, Number};
use misp_eval::Registry;
use misp_types::{Atom, EvalError, EvalResult, SetupError};

fn trap(function: &str, a: i32, b: i32) -> EvalError {
    EvalError::ArithmeticTrap(format!("{function}: {a} {function} {b} overflows"))
}

/// Apply a binary operator, promoting to decimal when either side is one.
fn binary(
    function: &str,
    a: &Atom,
    b: &Atom,
    integer: fn(i32, i32) -> EvalResult<i32>,
    decimal: fn(f32, f32) -> f32,
) -> EvalResult<Atom> {
    match (args::number(function, 1, a)?, args::number(function, 2, b)?) {
        (Number::Integer(x), Number::Integer(y)) => integer(x, y).map(Atom::integer),
        (x, y) => Ok(Atom::decimal(decimal(x.as_f32(), y.as_f32()))),
    }
}

fn compare(function: &str, a: &Atom, b: &Atom, less: bool) -> EvalResult<Atom> {
    let ordering = match (args::number(function, 1, a)?, args::number(function, 2, b)?) {
        (Number::Integer(x), Number::Integer(y)) => x.partial_cmp(&y),
        (x, y) => x.as_f32().partial_cmp(&y.as_f32()),
    };
    let expected = if less {
        std::cmp::Ordering::Less
    } else {
        std::cmp::Ordering::Greater
    };
    Ok(Atom::boolean(ordering == Some(expected)))
}

pub fn register(registry: &mut Registry) -> Result<(), SetupError> {
    registry.register("+ +value", |_, args| {
        let values = args::list("+", 1, &args[0])?;
        let numbers = values
            .iter()
            .enumerate()
            .map(|(i, v)| args::number("+", i + 1, v))
            .collect::<EvalResult<Vec<_>>>()?;

        if numbers.iter().any(|n| matches!(n, Number::Decimal(_))) {
            return Ok(Atom::decimal(numbers.iter().map(|n| n.as_f32()).sum()));
        }
        let mut sum: i32 = 0;
        for number in numbers {
            if let Number::Integer(v) = number {
                sum = sum.checked_add(v).ok_or_else(|| trap("+", sum, v))?;
            }
        }
        Ok(Atom::integer(sum))
    })?;

    registry.register("- a b", |_, args| {
        binary(
            "-",
            &args[0],
            &args[1],
            |a, b| a.checked_sub(b).ok_or_else(|| trap("-", a, b)),
            |a, b| a - b,
        )
    })?;

    registry.register("* a b", |_, args| {
        binary(
            "*",
            &args[0],
            &args[1],
            |a, b| a.checked_mul(b).ok_or_else(|| trap("*", a, b)),
            |a, b| a * b,
        )
    })?;

    // Decimal division by zero follows IEEE and yields an infinity or NaN.
    registry.register("/ a b", |_, args| {
        binary(
            "/",
            &args[0],
            &args[1],
            |a, b| {
                if b == 0 {
                    return Err(EvalError::ArithmeticTrap(format!("/: {a} divided by zero")));
                }
                a.checked_div(b).ok_or_else(|| trap("/", a, b))
            },
            |a, b| a / b,
        )
    })?;

    registry.register("< a b", |_, args| compare("<", &args[0], &args[1], true))?;
    registry.register("> a b", |_, args| compare(">", &args[0], &args[1], false))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_binary(a: i32, b: i32, op: fn(i32, i32) -> EvalResult<i32>) -> EvalResult<Atom> {
        binary("op", &Atom::integer(a), &Atom::integer(b), op, |a, b| a + b)
    }

    #[test]
    fn test_binary_promotes_on_decimal() {
        let result = binary(
            "-",
            &Atom::integer(3),
            &Atom::decimal(0.5),
            |a, b| Ok(a - b),
            |a, b| a - b,
        );
        assert_eq!(result, Ok(Atom::decimal(2.5)));
    }

    #[test]
    fn test_binary_rejects_non_numbers() {
        let result = binary("-", &Atom::string("1"), &Atom::integer(1), |a, _| Ok(a), |a, _| a);
        assert!(matches!(result, Err(EvalError::TypeMismatch(_))));
    }

    #[test]
    fn test_integer_path_propagates_trap() {
        let result = int_binary(i32::MAX, 1, |a, b| a.checked_add(b).ok_or_else(|| trap("+", a, b)));
        assert!(matches!(result, Err(EvalError::ArithmeticTrap(_))));
    }

    #[test]
    fn test_compare_mixed() {
        assert_eq!(
            compare("<", &Atom::integer(1), &Atom::decimal(1.5), true),
            Ok(Atom::integer(1))
        );
        assert_eq!(
            compare(">", &Atom::integer(1), &Atom::integer(1), false),
            Ok(Atom::integer(0))
        );
    }
}
