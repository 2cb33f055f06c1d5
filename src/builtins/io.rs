// ABOUTME: I/O builtins: print, prompt, read-file, write-file

use super::{define_builtin, expect_args, with_sandbox};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::io::{self, Write};
use std::rc::Rc;

fn builtin_print(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "print")?;
    println!("{}", v[0]);
    Ok(Value::Nil)
}

/// Reads one line from stdin, with the trailing newline stripped.
fn builtin_prompt(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    expect_args(args, 0, "prompt")?;
    io::stdout()
        .flush()
        .map_err(|e| EvalError::ArgumentError(format!("stdout flush failed: {}", e)))?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| EvalError::ArgumentError(format!("stdin read failed: {}", e)))?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::string(line))
}

fn expect_string_path<'a>(v: &'a Value, who: &str) -> Result<&'a str, EvalError> {
    match v {
        Value::String(s) => Ok(s),
        other => Err(EvalError::TypeError(format!(
            "{} expected a String path, got {}",
            who,
            other.type_name()
        ))),
    }
}

fn builtin_read_file(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "read-file")?;
    let path = expect_string_path(&v[0], "read-file")?;
    with_sandbox(|sandbox| {
        sandbox
            .read_file(path)
            .map(Value::string)
            .map_err(|e| EvalError::ArgumentError(e.to_string()))
    })
}

fn builtin_write_file(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, "write-file")?;
    let path = expect_string_path(&v[0], "write-file")?;
    let contents = expect_string_path(&v[1], "write-file")?;
    with_sandbox(|sandbox| {
        sandbox
            .write_file(path, contents)
            .map(|_| Value::Nil)
            .map_err(|e| EvalError::ArgumentError(e.to_string()))
    })
}

pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "print", builtin_print);
    define_builtin(env, "prompt", builtin_prompt);
    define_builtin(env, "read-file", builtin_read_file);
    define_builtin(env, "write-file", builtin_write_file);
}
