// ABOUTME: Binary arithmetic builtins: + - * mod // /
//
// Every operation here is strictly binary (num, num) -> num, per §4.7 —
// unlike the teacher's variadic `+`/`-`/`*`, this language has no
// `(+ 1 2 3)` form; the prelude supplies any variadic wrapper it wants
// on top of these two-argument primitives, grounded on mini.py's
// `add`/`subtract`/`multiply`/`idivide`/`mod` which all take exactly
// two operands.

use super::{define_builtin, expect_args};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

fn extract_number(v: &Value) -> Result<Num, EvalError> {
    match v {
        Value::Integer(n) => Ok(Num::Int(*n)),
        Value::Float(n) => Ok(Num::Float(*n)),
        other => Err(EvalError::TypeError(format!(
            "expected number, got {}",
            other.type_name()
        ))),
    }
}

fn both(args: &Value, who: &str) -> Result<(Num, Num), EvalError> {
    let v = expect_args(args, 2, who)?;
    Ok((extract_number(&v[0])?, extract_number(&v[1])?))
}

fn as_f64(n: Num) -> f64 {
    match n {
        Num::Int(i) => i as f64,
        Num::Float(f) => f,
    }
}

/// Floored modulo (sign follows the divisor), matching Python's `%`.
fn floor_mod_i64(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

/// Floored division, matching Python's `//`.
fn floor_div_i64(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn floor_mod_f64(a: f64, b: f64) -> f64 {
    a - b * (a / b).floor()
}

fn builtin_add(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let (a, b) = both(args, "+")?;
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => Ok(Value::Integer(x + y)),
        _ => Ok(Value::Float(as_f64(a) + as_f64(b))),
    }
}

fn builtin_sub(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let (a, b) = both(args, "-")?;
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => Ok(Value::Integer(x - y)),
        _ => Ok(Value::Float(as_f64(a) - as_f64(b))),
    }
}

fn builtin_mul(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let (a, b) = both(args, "*")?;
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => Ok(Value::Integer(x * y)),
        _ => Ok(Value::Float(as_f64(a) * as_f64(b))),
    }
}

fn builtin_mod(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let (a, b) = both(args, "mod")?;
    match (a, b) {
        (Num::Int(_), Num::Int(0)) => Err(EvalError::ArgumentError(
            "mod by zero".to_string(),
        )),
        (Num::Int(x), Num::Int(y)) => Ok(Value::Integer(floor_mod_i64(x, y))),
        _ => Ok(Value::Float(floor_mod_f64(as_f64(a), as_f64(b)))),
    }
}

fn builtin_idiv(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let (a, b) = both(args, "//")?;
    match (a, b) {
        (Num::Int(_), Num::Int(0)) => Err(EvalError::ArgumentError(
            "// by zero".to_string(),
        )),
        (Num::Int(x), Num::Int(y)) => Ok(Value::Integer(floor_div_i64(x, y))),
        _ => Ok(Value::Float((as_f64(a) / as_f64(b)).floor())),
    }
}

/// `/` — integer if both operands are integers and divide evenly,
/// float otherwise.
fn builtin_div(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let (a, b) = both(args, "/")?;
    match (a, b) {
        (Num::Int(x), Num::Int(y)) if y != 0 && x % y == 0 => Ok(Value::Integer(x / y)),
        _ => Ok(Value::Float(as_f64(a) / as_f64(b))),
    }
}

pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "+", builtin_add);
    define_builtin(env, "-", builtin_sub);
    define_builtin(env, "*", builtin_mul);
    define_builtin(env, "mod", builtin_mod);
    define_builtin(env, "//", builtin_idiv);
    define_builtin(env, "/", builtin_div);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Rc<Environment> {
        Environment::new()
    }

    #[test]
    fn integer_plus_integer_is_integer() {
        let args = Value::list(vec![Value::Integer(2), Value::Integer(3)]);
        assert!(matches!(builtin_add(&args, &env()), Ok(Value::Integer(5))));
    }

    #[test]
    fn any_float_operand_promotes_to_float() {
        let args = Value::list(vec![Value::Integer(2), Value::Float(3.0)]);
        assert!(matches!(builtin_add(&args, &env()), Ok(Value::Float(f)) if f == 5.0));
    }

    #[test]
    fn division_of_exactly_divisible_integers_is_integer() {
        let args = Value::list(vec![Value::Integer(6), Value::Integer(3)]);
        assert!(matches!(builtin_div(&args, &env()), Ok(Value::Integer(2))));
    }

    #[test]
    fn division_with_remainder_is_float() {
        let args = Value::list(vec![Value::Integer(7), Value::Integer(2)]);
        assert!(matches!(builtin_div(&args, &env()), Ok(Value::Float(f)) if (f - 3.5).abs() < 1e-9));
    }

    #[test]
    fn mod_by_zero_is_argument_error_not_a_panic() {
        let args = Value::list(vec![Value::Integer(5), Value::Integer(0)]);
        assert!(matches!(builtin_mod(&args, &env()), Err(EvalError::ArgumentError(_))));
    }

    #[test]
    fn idiv_by_zero_is_argument_error_not_a_panic() {
        let args = Value::list(vec![Value::Integer(5), Value::Integer(0)]);
        assert!(matches!(builtin_idiv(&args, &env()), Err(EvalError::ArgumentError(_))));
    }

    #[test]
    fn mod_follows_the_sign_of_the_divisor() {
        let args = Value::list(vec![Value::Integer(-7), Value::Integer(3)]);
        assert!(matches!(builtin_mod(&args, &env()), Ok(Value::Integer(2))));
    }

    #[test]
    fn non_number_operand_is_type_error() {
        let args = Value::list(vec![Value::string("x"), Value::Integer(1)]);
        assert!(matches!(builtin_add(&args, &env()), Err(EvalError::TypeError(_))));
    }
}
