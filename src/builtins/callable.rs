// ABOUTME: Callable builtins: wrap, unwrap (§4.4)

use super::{define_builtin, expect_args};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn builtin_wrap(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "wrap")?;
    match &v[0] {
        Value::Operative(_) | Value::Wrapper(_) => Ok(Value::Wrapper(Rc::new(v[0].clone()))),
        other => Err(EvalError::TypeError(format!(
            "wrap expected an Operative or Wrapper, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_unwrap(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "unwrap")?;
    match &v[0] {
        Value::Wrapper(underlying) => Ok((**underlying).clone()),
        other => Err(EvalError::UnwrapError(format!(
            "unwrap expected a Wrapper, got {}",
            other.type_name()
        ))),
    }
}

pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "wrap", builtin_wrap);
    define_builtin(env, "unwrap", builtin_unwrap);
}
