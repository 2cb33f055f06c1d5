// ABOUTME: Library module exposing internal components for testing

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod parser;
pub mod sandbox;
pub mod value;

pub use env::Environment;

use std::rc::Rc;

/// Build a root environment populated with the builtin table (§4.7 of
/// the language surface), ready to have a prelude loaded into a nested
/// scope beneath it.
pub fn root_environment(sandbox: Rc<sandbox::Sandbox>) -> Rc<env::Environment> {
    let root = env::Environment::new();
    builtins::register_all(&root, sandbox);
    root
}

/// Load and evaluate `predefineds.mini`-style source into `env`.
pub fn load_prelude(env: &Rc<env::Environment>, source: &str) -> Result<(), error::EvalError> {
    let program = parser::parse(source)?;
    eval::evaluate_expressions(&program, env)?;
    Ok(())
}
