// ABOUTME: Comparison builtins: = < > <= >=
//
// `=` is deep structural equality (value.rs's `values_equal`); the
// ordering operators accept numbers, strings, or symbols (by name) per
// §4.7, grounded on mini.py's `eq`/`lt`/`gt`/`le`/`ge`.

use super::expect_args;
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{values_equal, Value};
use std::cmp::Ordering;
use std::rc::Rc;

pub(crate) fn compare_values(a: &Value, b: &Value) -> Result<Ordering, EvalError> {
    match (a, b) {
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            let x = as_f64(a);
            let y = as_f64(b);
            x.partial_cmp(&y).ok_or_else(|| {
                EvalError::TypeError("cannot compare NaN".to_string())
            })
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::Symbol(x), Value::Symbol(y)) => Ok(x.name.cmp(&y.name)),
        _ => Err(EvalError::TypeError(format!(
            "cannot compare {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn as_f64(v: &Value) -> f64 {
    match v {
        Value::Integer(n) => *n as f64,
        Value::Float(n) => *n,
        _ => unreachable!("as_f64 called on a non-number"),
    }
}

fn builtin_eq(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, "=")?;
    Ok(Value::Boolean(values_equal(&v[0], &v[1])))
}

fn builtin_lt(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, "<")?;
    Ok(Value::Boolean(compare_values(&v[0], &v[1])? == Ordering::Less))
}

fn builtin_gt(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, ">")?;
    Ok(Value::Boolean(
        compare_values(&v[0], &v[1])? == Ordering::Greater,
    ))
}

fn builtin_le(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, "<=")?;
    Ok(Value::Boolean(compare_values(&v[0], &v[1])? != Ordering::Greater))
}

fn builtin_ge(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, ">=")?;
    Ok(Value::Boolean(compare_values(&v[0], &v[1])? != Ordering::Less))
}

pub fn register(env: &Rc<Environment>) {
    super::define_builtin(env, "=", builtin_eq);
    super::define_builtin(env, "<", builtin_lt);
    super::define_builtin(env, ">", builtin_gt);
    super::define_builtin(env, "<=", builtin_le);
    super::define_builtin(env, ">=", builtin_ge);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::intern;

    fn env() -> Rc<Environment> {
        Environment::new()
    }

    #[test]
    fn equal_symbols_compare_true() {
        let args = Value::list(vec![Value::Symbol(intern("x")), Value::Symbol(intern("x"))]);
        assert!(matches!(builtin_eq(&args, &env()), Ok(Value::Boolean(true))));
    }

    #[test]
    fn strings_order_lexicographically() {
        let args = Value::list(vec![Value::string("apple"), Value::string("banana")]);
        assert!(matches!(builtin_lt(&args, &env()), Ok(Value::Boolean(true))));
    }

    #[test]
    fn numbers_order_numerically_across_int_and_float() {
        let args = Value::list(vec![Value::Integer(3), Value::Float(3.5)]);
        assert!(matches!(builtin_lt(&args, &env()), Ok(Value::Boolean(true))));
    }

    #[test]
    fn le_and_ge_include_equality() {
        let args = Value::list(vec![Value::Integer(4), Value::Integer(4)]);
        assert!(matches!(builtin_le(&args, &env()), Ok(Value::Boolean(true))));
        assert!(matches!(builtin_ge(&args, &env()), Ok(Value::Boolean(true))));
    }

    #[test]
    fn comparing_incomparable_types_is_type_error() {
        let args = Value::list(vec![Value::Integer(1), Value::string("x")]);
        assert!(matches!(builtin_lt(&args, &env()), Err(EvalError::TypeError(_))));
    }
}
