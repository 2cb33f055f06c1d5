// ABOUTME: Boolean negation builtin: not

use super::{define_builtin, expect_args};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn builtin_not(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "not")?;
    Ok(Value::Boolean(!v[0].is_truthy_boolean()?))
}

pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "not", builtin_not);
}
