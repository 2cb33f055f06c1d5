// ABOUTME: Meta builtins: read, evaluate, identifier->symbol

use super::{define_builtin, expect_args};
use crate::env::Environment;
use crate::error::EvalError;
use crate::eval;
use crate::parser;
use crate::value::{intern, Value};
use std::rc::Rc;

fn builtin_read(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "read")?;
    match &v[0] {
        Value::String(s) => parser::parse_one(s),
        other => Err(EvalError::TypeError(format!(
            "read expected a String, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_evaluate(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 2, "evaluate")?;
    match &v[1] {
        Value::Env(target_env) => eval::evaluate(&v[0], target_env),
        other => Err(EvalError::TypeError(format!(
            "evaluate expected an Environment, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_identifier_to_symbol(args: &Value, _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let v = expect_args(args, 1, "identifier->symbol")?;
    match &v[0] {
        Value::Identifier(id) => Ok(Value::Symbol(intern(&id.name))),
        other => Err(EvalError::TypeError(format!(
            "identifier->symbol expected an Identifier, got {}",
            other.type_name()
        ))),
    }
}

pub fn register(env: &Rc<Environment>) {
    define_builtin(env, "read", builtin_read);
    define_builtin(env, "evaluate", builtin_evaluate);
    define_builtin(env, "identifier->symbol", builtin_identifier_to_symbol);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_then_evaluate_matches_direct_evaluation() {
        let env = Environment::new();
        env.define("x", Value::Integer(9)).unwrap();

        let read_args = Value::list(vec![Value::string("(+ x 1)")]);
        let expr = builtin_read(&read_args, &env).unwrap();

        let eval_args = Value::list(vec![expr, Value::Env(env.clone())]);
        // `+` isn't bound in this bare test environment, so evaluating
        // resolves `x` fine but fails looking up `+` — that's expected
        // here; this test exercises the read/evaluate plumbing, not `+`.
        let err = builtin_evaluate(&eval_args, &env).unwrap_err();
        assert!(matches!(err, EvalError::UndefinedIdentifierError(_)));
    }

    #[test]
    fn read_rejects_more_than_one_expression() {
        let args = Value::list(vec![Value::string("1 2")]);
        let env = Environment::new();
        assert!(matches!(builtin_read(&args, &env), Err(EvalError::ArgumentError(_))));
    }

    #[test]
    fn identifier_to_symbol_interns_by_name() {
        let env = Environment::new();
        let id = Value::Identifier(Rc::new(crate::value::IdentifierData {
            name: "foo".to_string(),
            span: None,
        }));
        let args = Value::list(vec![id]);
        let sym = builtin_identifier_to_symbol(&args, &env).unwrap();
        assert!(matches!(sym, Value::Symbol(s) if s.name == "foo"));
    }

    #[test]
    fn evaluate_rejects_a_non_environment_second_argument() {
        let env = Environment::new();
        let args = Value::list(vec![Value::Integer(1), Value::Integer(2)]);
        assert!(matches!(builtin_evaluate(&args, &env), Err(EvalError::TypeError(_))));
    }
}
