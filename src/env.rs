// ABOUTME: Environment module for managing variable bindings and scopes

use crate::error::EvalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A chained scope of name -> Value bindings with an optional parent.
/// The parent link is a typed field rather than a reserved key in the
/// map, since nothing here needs the environment to double as ordinary
/// script-level data — the `cons-dict` builtins are a separate,
/// unrelated structure built from Pairs.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new root environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a child environment whose parent link points at `parent`.
    pub fn nest(parent: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(parent)),
        })
    }

    /// Raw insertion into *this* scope only, with no collision check.
    /// Used for call-frame setup (operative parameter and
    /// calling-environment binding) where shadowing a parent is exactly
    /// what a closure invocation requires.
    pub fn bind(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// The `define` special form's binding rule: fails if `name` is
    /// already bound anywhere in the chain, including this scope.
    pub fn define(&self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.is_defined(name) {
            return Err(EvalError::AlreadyDefinedError(format!(
                "the identifier {} is already defined",
                name
            )));
        }
        self.bind(name, value);
        Ok(())
    }

    /// Searches this environment, then its parent, then its parent's
    /// parent, to the root.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.lookup(name),
            None => None,
        }
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name) || self.parent.as_deref().is_some_and(|p| p.is_defined(name))
    }
}
