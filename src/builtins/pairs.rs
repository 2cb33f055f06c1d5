// ABOUTME: Pair builtins: cons, car, cdr

use super::{define_builtin, expect_args};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn builtin_cons(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, "cons")?;
    Ok(Value::cons(v[0].clone(), v[1].clone()))
}

fn builtin_car(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "car")?;
    match v[0].as_pair() {
        Some(pair) => Ok(pair.car.clone()),
        None => Err(EvalError::TypeError(format!(
            "car expected a Pair, got {}",
            v[0].type_name()
        ))),
    }
}

fn builtin_cdr(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "cdr")?;
    match v[0].as_pair() {
        Some(pair) => Ok(pair.cdr.clone()),
        None => Err(EvalError::TypeError(format!(
            "cdr expected a Pair, got {}",
            v[0].type_name()
        ))),
    }
}

pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "cons", builtin_cons);
    define_builtin(env, "car", builtin_car);
    define_builtin(env, "cdr", builtin_cdr);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_and_cdr_of_cons_recover_the_parts() {
        let env = Environment::new();
        let cons_args = Value::list(vec![Value::Integer(1), Value::Integer(2)]);
        let pair = builtin_cons(&cons_args, &env).unwrap();

        let car_args = Value::list(vec![pair.clone()]);
        assert!(matches!(builtin_car(&car_args, &env), Ok(Value::Integer(1))));

        let cdr_args = Value::list(vec![pair]);
        assert!(matches!(builtin_cdr(&cdr_args, &env), Ok(Value::Integer(2))));
    }

    #[test]
    fn car_of_non_pair_is_type_error() {
        let env = Environment::new();
        let args = Value::list(vec![Value::Integer(5)]);
        assert!(matches!(builtin_car(&args, &env), Err(EvalError::TypeError(_))));
    }
}
