// ABOUTME: Builtin surface module (§4.6/§4.7): special forms and applicatives
//
// Special forms are bound as raw Operatives (arguments unevaluated);
// everything else is bound as a Wrapper over a Host Operative, so the
// argument list a builtin function sees has already been evaluated
// left-to-right by the same Wrapper machinery user code goes through.

use crate::env::Environment;
use crate::error::EvalError;
use crate::sandbox::Sandbox;
use crate::value::{HostFn, OperativeData, Value};
use std::cell::RefCell;
use std::rc::Rc;

pub mod arithmetic;
pub mod callable;
pub mod comparison;
pub mod dict;
pub mod io;
pub mod logic;
pub mod meta;
pub mod pairs;
pub mod special_forms;
pub mod strings;

// `HostFn` is a plain `fn` pointer with no closure environment, so the
// I/O builtins reach the sandbox through thread-local storage rather
// than capturing it — the same pattern the teacher crate used for its
// filesystem/network builtins.
thread_local! {
    static SANDBOX: RefCell<Option<Rc<Sandbox>>> = const { RefCell::new(None) };
}

fn set_sandbox(sandbox: Rc<Sandbox>) {
    SANDBOX.with(|s| *s.borrow_mut() = Some(sandbox));
}

pub(crate) fn with_sandbox<T>(
    f: impl FnOnce(&Sandbox) -> Result<T, EvalError>,
) -> Result<T, EvalError> {
    SANDBOX.with(|s| match s.borrow().as_ref() {
        Some(sandbox) => f(sandbox),
        None => Err(EvalError::NotImplementedError(
            "filesystem sandbox is not configured".to_string(),
        )),
    })
}

/// Collect a Nil-terminated Pair-chain argument list into a Vec for
/// convenient indexing.
pub(crate) fn arg_vec(args: &Value) -> Vec<Value> {
    args.iter_list().cloned().collect()
}

pub(crate) fn expect_args(args: &Value, n: usize, who: &str) -> Result<Vec<Value>, EvalError> {
    let v = arg_vec(args);
    if v.len() != n {
        return Err(EvalError::ArgumentError(format!(
            "{} expected {} argument{}, received {}",
            who,
            n,
            if n == 1 { "" } else { "s" },
            v.len()
        )));
    }
    Ok(v)
}

/// Bind a special form: a raw Operative, receiving arguments unevaluated.
pub(crate) fn define_special(env: &Rc<Environment>, name: &'static str, func: HostFn) {
    env.bind(
        name,
        Value::Operative(Rc::new(OperativeData::Host { name, func })),
    );
}

/// Bind a builtin applicative: a Wrapper over a Host Operative, so
/// callers' arguments are pre-evaluated before `func` runs.
pub(crate) fn define_builtin(env: &Rc<Environment>, name: &'static str, func: HostFn) {
    let op = Value::Operative(Rc::new(OperativeData::Host { name, func }));
    env.bind(name, Value::Wrapper(Rc::new(op)));
}

/// Populate `env` with every special form and builtin applicative, and
/// make `sandbox` reachable to the `read-file`/`write-file` builtins.
pub fn register_all(env: &Rc<Environment>, sandbox: Rc<Sandbox>) {
    set_sandbox(sandbox);

    // `nil`/`true`/`false` are not reader syntax (§4.1 has no literal
    // token for them); like the rest of the builtin surface they are
    // ordinary identifier bindings in the root environment, exactly
    // `mini.py`'s `builtins` table entries `'nil': NIL, 'true': TRUE,
    // 'false': FALSE`.
    env.bind("nil", Value::Nil);
    env.bind("true", Value::Boolean(true));
    env.bind("false", Value::Boolean(false));

    special_forms::register(env);
    arithmetic::register(env);
    comparison::register(env);
    pairs::register(env);
    strings::register(env);
    logic::register(env);
    callable::register(env);
    meta::register(env);
    dict::register(env);
    io::register(env);
}
