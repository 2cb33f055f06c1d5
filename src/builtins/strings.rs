// ABOUTME: String builtins: length, slice, concatenate

use super::{define_builtin, expect_args};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn expect_string<'a>(v: &'a Value, who: &str) -> Result<&'a str, EvalError> {
    match v {
        Value::String(s) => Ok(s),
        other => Err(EvalError::TypeError(format!(
            "{} expected a String, got {}",
            who,
            other.type_name()
        ))),
    }
}

fn builtin_length(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "length")?;
    let s = expect_string(&v[0], "length")?;
    Ok(Value::Integer(s.chars().count() as i64))
}

/// `slice(s, a, b)` — `Nil` at either end means "0" or "the string's
/// length" respectively.
fn builtin_slice(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 3, "slice")?;
    let chars: Vec<char> = expect_string(&v[0], "slice")?.chars().collect();

    let start = match &v[1] {
        Value::Nil => 0,
        Value::Integer(n) if *n >= 0 => *n as usize,
        other => {
            return Err(EvalError::TypeError(format!(
                "slice expected a non-negative Integer or nil, got {}",
                other.type_name()
            )))
        }
    };
    let end = match &v[2] {
        Value::Nil => chars.len(),
        Value::Integer(n) if *n >= 0 => *n as usize,
        other => {
            return Err(EvalError::TypeError(format!(
                "slice expected a non-negative Integer or nil, got {}",
                other.type_name()
            )))
        }
    };

    // Python slice semantics (original_source/mini.py's `slice`, which
    // is a bare `py_string[py_start:py_end]`): out-of-range indices
    // clamp rather than error, and a reversed range is simply empty.
    let start = start.min(chars.len());
    let end = end.min(chars.len());
    if start >= end {
        return Ok(Value::string(String::new()));
    }

    Ok(Value::string(chars[start..end].iter().collect::<String>()))
}

fn builtin_concatenate(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, "concatenate")?;
    let a = expect_string(&v[0], "concatenate")?;
    let b = expect_string(&v[1], "concatenate")?;
    Ok(Value::string(format!("{}{}", a, b)))
}

pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "length", builtin_length);
    define_builtin(env, "slice", builtin_slice);
    define_builtin(env, "concatenate", builtin_concatenate);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Rc<Environment> {
        Environment::new()
    }

    #[test]
    fn slice_clamps_an_end_past_the_string_length() {
        let args = Value::list(vec![Value::string("abc"), Value::Integer(1), Value::Integer(10)]);
        assert!(matches!(builtin_slice(&args, &env()), Ok(Value::String(s)) if &*s == "bc"));
    }

    #[test]
    fn slice_returns_empty_string_on_a_reversed_range() {
        let args = Value::list(vec![Value::string("abcd"), Value::Integer(3), Value::Integer(1)]);
        assert!(matches!(builtin_slice(&args, &env()), Ok(Value::String(s)) if s.is_empty()));
    }

    #[test]
    fn slice_nil_ends_default_to_the_whole_string() {
        let args = Value::list(vec![Value::string("hello"), Value::Nil, Value::Nil]);
        assert!(matches!(builtin_slice(&args, &env()), Ok(Value::String(s)) if &*s == "hello"));
    }

    #[test]
    fn length_counts_chars() {
        let args = Value::list(vec![Value::string("hello")]);
        assert!(matches!(builtin_length(&args, &env()), Ok(Value::Integer(5))));
    }

    #[test]
    fn concatenate_joins_two_strings() {
        let args = Value::list(vec![Value::string("foo"), Value::string("bar")]);
        assert!(matches!(builtin_concatenate(&args, &env()), Ok(Value::String(s)) if &*s == "foobar"));
    }
}
