// ABOUTME: Evaluator module: dispatch, application, and operative invocation

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{OperativeData, ParamSpec, Value};
use std::rc::Rc;

/// `evaluate(expr, env)`: atoms self-evaluate, Identifiers resolve
/// through the environment chain, and a Pair is an application form —
/// evaluate its head, then dispatch on whether the result is an
/// Operative (unevaluated invocation) or a Wrapper (evaluate arguments
/// first). No identifier name is special-cased here: `if`, `define`,
/// `operative`, and the rest are ordinary bindings whose values happen
/// to be Operatives.
pub fn evaluate(expr: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match expr {
        Value::Nil
        | Value::Boolean(_)
        | Value::Integer(_)
        | Value::Float(_)
        | Value::String(_)
        | Value::Symbol(_) => Ok(expr.clone()),

        Value::Identifier(id) => env.lookup(&id.name).ok_or_else(|| {
            EvalError::UndefinedIdentifierError(format!("Undefined identifier {}", id.name))
        }),

        Value::Pair(pair) => {
            let callable = evaluate(&pair.car, env)?;
            apply(&callable, &pair.cdr, env)
        }

        // Operatives, Wrappers, and Environment handles are themselves
        // values in tail position (e.g. the result of `wrap` stored in
        // a variable and evaluated again); they self-evaluate too.
        Value::Operative(_) | Value::Wrapper(_) | Value::Env(_) => Ok(expr.clone()),
    }
}

/// Invoke `callable` with the unevaluated argument list `args`.
/// An Operative receives `args` as-is; a Wrapper evaluates each element
/// left-to-right first, then invokes its underlying callable the same
/// way — this is the one wrapping layer per `Value::Wrapper`, and
/// stacking follows from `Wrapper` being able to wrap another `Wrapper`.
pub fn apply(callable: &Value, args: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match callable {
        Value::Operative(op) => invoke_operative(op, args, env),
        Value::Wrapper(underlying) => {
            let evaluated = evaluate_list(args, env)?;
            apply(underlying, &evaluated, env)
        }
        other => Err(EvalError::TypeError(format!(
            "expected applicative, got {}",
            other.type_name()
        ))),
    }
}

/// Evaluate each element of a Pair-chain argument list, left to right,
/// into a fresh Nil-terminated list.
pub fn evaluate_list(args: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let mut items = Vec::new();
    for item in args.iter_list() {
        items.push(evaluate(item, env)?);
    }
    Ok(Value::list(items))
}

/// Evaluate each expression of a (possibly empty) Pair-chain in
/// sequence; returns the last value, or Nil for an empty chain.
/// Intermediate values are discarded.
pub fn evaluate_expressions(exprs: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let mut result = Value::Nil;
    for expr in exprs.iter_list() {
        result = evaluate(expr, env)?;
    }
    Ok(result)
}

fn invoke_operative(
    op: &Rc<OperativeData>,
    args: &Value,
    call_env: &Rc<Environment>,
) -> Result<Value, EvalError> {
    match op.as_ref() {
        OperativeData::Host { func, .. } => func(args, call_env),
        OperativeData::User {
            params,
            calling_env_name,
            body,
            env,
        } => {
            let frame = Environment::nest(env);

            match params {
                ParamSpec::Variadic(name) => frame.bind(name.clone(), args.clone()),
                ParamSpec::Fixed(names) => {
                    let provided = args.list_len();
                    if provided != names.len() {
                        return Err(EvalError::ArgumentError(format!(
                            "operative expected {} arguments, received {}",
                            names.len(),
                            provided
                        )));
                    }
                    for (name, value) in names.iter().zip(args.iter_list()) {
                        frame.bind(name.clone(), value.clone());
                    }
                }
            }
            frame.bind(calling_env_name.clone(), Value::Env(Rc::clone(call_env)));

            let mut result = Value::Nil;
            for expr in body {
                result = evaluate(expr, &frame)?;
            }
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::intern;

    fn host_operative(
        name: &'static str,
        func: crate::value::HostFn,
    ) -> Value {
        Value::Operative(Rc::new(OperativeData::Host { name, func }))
    }

    fn host_apply_is_pair(_args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
        Ok(Value::Boolean(true))
    }

    #[test]
    fn atoms_self_evaluate() {
        let env = Environment::new();
        assert!(matches!(evaluate(&Value::Integer(1), &env), Ok(Value::Integer(1))));
        assert!(matches!(evaluate(&Value::Nil, &env), Ok(Value::Nil)));
        assert!(matches!(evaluate(&Value::Boolean(true), &env), Ok(Value::Boolean(true))));
        let sym = Value::Symbol(intern("foo"));
        assert!(matches!(evaluate(&sym, &env), Ok(Value::Symbol(_))));
    }

    #[test]
    fn identifier_resolves_through_environment() {
        let env = Environment::new();
        env.define("x", Value::Integer(42)).unwrap();
        let id = Value::Identifier(Rc::new(crate::value::IdentifierData {
            name: "x".to_string(),
            span: None,
        }));
        assert!(matches!(evaluate(&id, &env), Ok(Value::Integer(42))));
    }

    #[test]
    fn undefined_identifier_is_an_error() {
        let env = Environment::new();
        let id = Value::Identifier(Rc::new(crate::value::IdentifierData {
            name: "missing".to_string(),
            span: None,
        }));
        let err = evaluate(&id, &env).unwrap_err();
        assert!(matches!(err, EvalError::UndefinedIdentifierError(_)));
    }

    #[test]
    fn operative_receives_unevaluated_arguments() {
        let env = Environment::new();
        env.define("echo", host_operative("echo", |args, _env| Ok(args.clone())))
            .unwrap();
        let id = Value::Identifier(Rc::new(crate::value::IdentifierData {
            name: "echo".to_string(),
            span: None,
        }));
        let undefined_ident = Value::Identifier(Rc::new(crate::value::IdentifierData {
            name: "never-defined".to_string(),
            span: None,
        }));
        let call = Value::cons(id, Value::cons(undefined_ident.clone(), Value::Nil));
        // the operative never evaluates its argument, so an undefined
        // identifier inside it does not raise
        let result = evaluate(&call, &env).unwrap();
        assert!(matches!(result, Value::Pair(_)));
    }

    #[test]
    fn wrapper_evaluates_arguments_before_invoking() {
        let env = Environment::new();
        let underlying = host_operative("is-pair", host_apply_is_pair);
        let wrapped = Value::Wrapper(Rc::new(underlying));
        env.define("f", wrapped).unwrap();

        let id = Value::Identifier(Rc::new(crate::value::IdentifierData {
            name: "f".to_string(),
            span: None,
        }));
        let call = Value::cons(id, Value::Nil);
        assert!(matches!(evaluate(&call, &env), Ok(Value::Boolean(true))));
    }

    #[test]
    fn applying_a_non_callable_is_a_type_error() {
        let env = Environment::new();
        let call = Value::cons(Value::Integer(1), Value::Nil);
        let err = evaluate(&call, &env).unwrap_err();
        assert!(matches!(err, EvalError::TypeError(_)));
    }
}
