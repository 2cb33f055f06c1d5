// ABOUTME: Special forms (§4.6): define, if, operative, assert, throws?, defined?
//
// All bound as raw Operatives — arguments arrive unevaluated, exactly
// as the evaluator hands them off for any Pair whose head resolves to
// an Operative. Grounded on mini.py's `define`/`_if`/`operative`/
// `_assert`/`throws`/`defined_p`.

use super::{arg_vec, define_special};
use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::{evaluate, evaluate_expressions};
use crate::value::{IdentifierData, OperativeData, ParamSpec, Value};
use std::rc::Rc;

fn identifier_name(v: &Value, who: &str) -> Result<String, EvalError> {
    match v {
        Value::Identifier(id) => Ok(id.name.clone()),
        other => Err(EvalError::ArgumentError(format!(
            "{} expected an Identifier, got {}",
            who,
            other.type_name()
        ))),
    }
}

/// `(define name expr…)`
fn builtin_define(args: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let items = arg_vec(args);
    if items.len() < 2 {
        return Err(EvalError::DefineError(format!(
            "define expected two arguments, received {}",
            items.len()
        )));
    }
    let (name_expr, body) = items.split_first().expect("checked len >= 2 above");

    let name = match name_expr {
        Value::Identifier(id) => id.name.clone(),
        // A list in name position is a destructuring pattern: reserved
        // syntax, not yet implemented.
        Value::Pair(_) => {
            return Err(EvalError::NotImplementedError(
                "defining patterns is not yet implemented".to_string(),
            ))
        }
        other => {
            return Err(EvalError::TypeError(format!(
                "define expected an Identifier or list, got {}",
                other.type_name()
            )))
        }
    };

    let body_list = Value::list(body.to_vec());
    let value = evaluate_expressions(&body_list, env)?;
    env.define(&name, value)?;
    Ok(Value::Nil)
}

/// `(defined? name)`
fn builtin_defined_p(args: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let items = arg_vec(args);
    if items.len() != 1 {
        return Err(EvalError::ArgumentError(format!(
            "defined? expected 1 argument, received {}",
            items.len()
        )));
    }
    match &items[0] {
        Value::Identifier(id) => Ok(Value::Boolean(env.is_defined(&id.name))),
        other => Err(EvalError::TypeError(format!(
            "defined? expected an Identifier, got {}",
            other.type_name()
        ))),
    }
}

/// `(if cond then [else])` — two- or three-argument form.
fn builtin_if(args: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let items = arg_vec(args);
    if items.len() != 2 && items.len() != 3 {
        return Err(EvalError::ArgumentError(format!(
            "if expected 2 or 3 arguments, received {}",
            items.len()
        )));
    }

    let cond = evaluate(&items[0], env)?.is_truthy_boolean()?;
    if cond {
        evaluate(&items[1], env)
    } else if items.len() == 3 {
        evaluate(&items[2], env)
    } else {
        Ok(Value::Nil)
    }
}

/// `(assert [desc] pred)` — evaluated in a fresh nested scope.
fn builtin_assert(args: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let items = arg_vec(args);
    if items.is_empty() || items.len() > 2 {
        return Err(EvalError::ArgumentError(format!(
            "assert expected 1 or 2 arguments, received {}",
            items.len()
        )));
    }

    let scope = Environment::nest(env);
    let (desc, pred_expr) = if items.len() == 2 {
        (Some(evaluate(&items[0], &scope)?), &items[1])
    } else {
        (None, &items[0])
    };

    let pred = evaluate(pred_expr, &scope)?.is_truthy_boolean()?;
    if pred {
        return Ok(Value::Nil);
    }

    let message = match desc {
        Some(Value::String(s)) => s.to_string(),
        Some(_) => "assertion failed".to_string(),
        None => "assertion failed".to_string(),
    };
    Err(EvalError::AssertionError(message))
}

/// `(throws? expr type-string)`
fn builtin_throws_p(args: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let items = arg_vec(args);
    if items.len() != 2 {
        return Err(EvalError::ArgumentError(format!(
            "throws? expected 2 arguments, received {}",
            items.len()
        )));
    }

    let type_string = match evaluate(&items[1], env)? {
        Value::String(s) => s,
        other => {
            return Err(EvalError::ArgumentError(format!(
                "throws? expects a string as the second argument, got {}",
                other.type_name()
            )))
        }
    };

    match evaluate(&items[0], env) {
        Ok(_) => Ok(Value::Boolean(false)),
        Err(err) if err.tag() == &*type_string => Ok(Value::Boolean(true)),
        Err(err) => Err(err),
    }
}

fn params_from(expr: &Value) -> Result<ParamSpec, EvalError> {
    match expr {
        Value::Identifier(id) => Ok(ParamSpec::Variadic(id.name.clone())),
        Value::Nil => Ok(ParamSpec::Fixed(Vec::new())),
        Value::Pair(_) => {
            let mut names = Vec::new();
            for item in expr.iter_list() {
                names.push(identifier_name(item, "operative")?);
            }
            if !matches!(expr.list_tail(), Value::Nil) {
                return Err(EvalError::ArgumentError(
                    "operative parameter list must be a proper list of Identifiers".to_string(),
                ));
            }
            Ok(ParamSpec::Fixed(names))
        }
        other => Err(EvalError::ArgumentError(format!(
            "operative expected an Identifier or a list of Identifiers for its parameters, got {}",
            other.type_name()
        ))),
    }
}

/// `(operative <params> <calling-env-name> <body…>)`
fn builtin_operative(args: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let items = arg_vec(args);
    if items.len() < 2 {
        return Err(EvalError::ArgumentError(
            "operative expected at least a parameter spec and a calling-environment name"
                .to_string(),
        ));
    }

    let params = params_from(&items[0])?;
    let calling_env_name = identifier_name(&items[1], "operative")?;

    let param_names: Vec<&str> = match &params {
        ParamSpec::Variadic(name) => vec![name.as_str()],
        ParamSpec::Fixed(names) => names.iter().map(String::as_str).collect(),
    };
    let mut seen = std::collections::HashSet::new();
    for name in &param_names {
        if !seen.insert(*name) {
            return Err(EvalError::ArgumentError(format!(
                "operative parameter names must be pairwise distinct, {} repeats",
                name
            )));
        }
        if *name == calling_env_name {
            return Err(EvalError::ArgumentError(format!(
                "operative parameter name {} collides with the calling-environment name",
                name
            )));
        }
    }

    let body: Vec<Value> = items[2..].to_vec();
    Ok(Value::Operative(Rc::new(OperativeData::User {
        params,
        calling_env_name,
        body,
        env: Rc::clone(env),
    })))
}

pub fn register(env: &Rc<Environment>) {
    define_special(env, "define", builtin_define);
    define_special(env, "defined?", builtin_defined_p);
    define_special(env, "if", builtin_if);
    define_special(env, "assert", builtin_assert);
    define_special(env, "throws?", builtin_throws_p);
    define_special(env, "operative", builtin_operative);
}
