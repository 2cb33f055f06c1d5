// ABOUTME: Ordered cons-based dictionary builtins: cons-dict-set, cons-dict-get
//
// Has no counterpart in mini.py — the original source's `builtins` dict
// has no entry for it at all. Grounded only in §4.7's own description
// and the general Pair/`<`/`cons` machinery already specified elsewhere:
// each node is `((key . value) . (left . right))`, ordered by key using
// `<`. `nil` is the empty tree.

use super::expect_args;
use crate::builtins::comparison::compare_values;
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::cmp::Ordering;
use std::rc::Rc;

fn make_node(key: Value, value: Value, left: Value, right: Value) -> Value {
    Value::cons(Value::cons(key, value), Value::cons(left, right))
}

fn split_node(dict: &Value, who: &str) -> Result<(Value, Value, Value, Value), EvalError> {
    let outer = dict.as_pair().ok_or_else(|| {
        EvalError::TypeError(format!(
            "{} expected a cons-dict node, got {}",
            who,
            dict.type_name()
        ))
    })?;
    let kv = outer.car.as_pair().ok_or_else(|| {
        EvalError::TypeError(format!("{} expected a malformed-free cons-dict node", who))
    })?;
    let lr = outer.cdr.as_pair().ok_or_else(|| {
        EvalError::TypeError(format!("{} expected a malformed-free cons-dict node", who))
    })?;
    Ok((kv.car.clone(), kv.cdr.clone(), lr.car.clone(), lr.cdr.clone()))
}

fn dict_set(dict: &Value, key: &Value, value: &Value) -> Result<Value, EvalError> {
    match dict {
        Value::Nil => Ok(make_node(key.clone(), value.clone(), Value::Nil, Value::Nil)),
        Value::Pair(_) => {
            let (existing_key, existing_value, left, right) = split_node(dict, "cons-dict-set")?;
            match compare_values(key, &existing_key)? {
                Ordering::Equal => Ok(make_node(existing_key, value.clone(), left, right)),
                Ordering::Less => Ok(make_node(
                    existing_key,
                    existing_value,
                    dict_set(&left, key, value)?,
                    right,
                )),
                Ordering::Greater => Ok(make_node(
                    existing_key,
                    existing_value,
                    left,
                    dict_set(&right, key, value)?,
                )),
            }
        }
        other => Err(EvalError::TypeError(format!(
            "cons-dict-set expected a cons-dict, got {}",
            other.type_name()
        ))),
    }
}

fn dict_get(dict: &Value, key: &Value) -> Result<Value, EvalError> {
    match dict {
        Value::Nil => Err(EvalError::KeyError(format!("key {} not found", key))),
        Value::Pair(_) => {
            let (existing_key, existing_value, left, right) = split_node(dict, "cons-dict-get")?;
            match compare_values(key, &existing_key)? {
                Ordering::Equal => Ok(existing_value),
                Ordering::Less => dict_get(&left, key),
                Ordering::Greater => dict_get(&right, key),
            }
        }
        other => Err(EvalError::TypeError(format!(
            "cons-dict-get expected a cons-dict, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_cons_dict_set(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 3, "cons-dict-set")?;
    dict_set(&v[0], &v[1], &v[2])
}

fn builtin_cons_dict_get(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, "cons-dict-get")?;
    dict_get(&v[0], &v[1])
}

pub fn register(env: &Rc<Environment>) {
    super::define_builtin(env, "cons-dict-set", builtin_cons_dict_set);
    super::define_builtin(env, "cons-dict-get", builtin_cons_dict_get);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let dict = dict_set(&Value::Nil, &Value::Integer(5), &Value::string("five")).unwrap();
        let dict = dict_set(&dict, &Value::Integer(2), &Value::string("two")).unwrap();
        let dict = dict_set(&dict, &Value::Integer(8), &Value::string("eight")).unwrap();

        assert!(matches!(dict_get(&dict, &Value::Integer(5)), Ok(Value::String(s)) if &*s == "five"));
        assert!(matches!(dict_get(&dict, &Value::Integer(2)), Ok(Value::String(s)) if &*s == "two"));
        assert!(matches!(dict_get(&dict, &Value::Integer(8)), Ok(Value::String(s)) if &*s == "eight"));
    }

    #[test]
    fn missing_key_is_key_error() {
        let dict = dict_set(&Value::Nil, &Value::Integer(1), &Value::Integer(10)).unwrap();
        assert!(matches!(dict_get(&dict, &Value::Integer(2)), Err(EvalError::KeyError(_))));
    }

    #[test]
    fn set_overwrites_existing_key() {
        let dict = dict_set(&Value::Nil, &Value::Integer(1), &Value::Integer(10)).unwrap();
        let dict = dict_set(&dict, &Value::Integer(1), &Value::Integer(20)).unwrap();
        assert!(matches!(dict_get(&dict, &Value::Integer(1)), Ok(Value::Integer(20))));
    }
}
