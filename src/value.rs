// ABOUTME: Value types representing the Lisp data and callable model

use crate::env::Environment;
use crate::error::EvalError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A byte-offset span into the source the reader consumed, carried on
/// reader-produced values purely for diagnostics; the evaluator never
/// inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

/// An interned symbol: two symbols with the same name are the same
/// `Rc` allocation, so identity comparison (`Rc::ptr_eq`) is name equality.
#[derive(Debug)]
pub struct SymbolData {
    pub name: String,
}

pub type Symbol = Rc<SymbolData>;

thread_local! {
    static INTERNER: RefCell<HashMap<String, Symbol>> = RefCell::new(HashMap::new());
}

/// Intern `name`, returning the process-wide singleton `Symbol` for it.
pub fn intern(name: &str) -> Symbol {
    INTERNER.with(|table| {
        let mut table = table.borrow_mut();
        if let Some(sym) = table.get(name) {
            return Rc::clone(sym);
        }
        let sym = Rc::new(SymbolData {
            name: name.to_string(),
        });
        table.insert(name.to_string(), Rc::clone(&sym));
        sym
    })
}

/// A reader-produced name, not interned, carrying its source span.
/// Evaluates by environment lookup; never self-evaluating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierData {
    pub name: String,
    pub span: Option<SourceSpan>,
}

/// A cons cell. `car`/`cdr` are fixed at construction; lists are
/// right-nested chains of `Pair` terminated by `Nil`.
#[derive(Debug)]
pub struct PairData {
    pub car: Value,
    pub cdr: Value,
}

/// The shape of the parameter list accepted by `operative`.
#[derive(Debug, Clone)]
pub enum ParamSpec {
    /// `(operative args env body...)` — binds the whole unevaluated
    /// argument list to `args`.
    Variadic(String),
    /// `(operative (a b) env body...)` — binds each argument
    /// positionally; arity must match exactly.
    Fixed(Vec<String>),
}

/// A host-provided operative. Receives the *unevaluated* argument list
/// (already evaluated, if reached through a `Wrapper`) and the
/// environment the call was made in. This is the one invocation
/// signature shared by every special form and every builtin — the
/// difference between `if` and `+` is only what each function does with
/// its arguments, not how it is called.
pub type HostFn = fn(&Value, &Rc<Environment>) -> Result<Value, EvalError>;

#[derive(Clone)]
pub enum OperativeData {
    /// Constructed by the `operative` special form.
    User {
        params: ParamSpec,
        calling_env_name: String,
        body: Vec<Value>,
        env: Rc<Environment>,
    },
    /// A special form or builtin implemented in Rust.
    Host { name: &'static str, func: HostFn },
}

impl fmt::Debug for OperativeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperativeData::User {
                calling_env_name, ..
            } => f
                .debug_struct("User")
                .field("calling_env_name", calling_env_name)
                .finish(),
            OperativeData::Host { name, .. } => f.debug_struct("Host").field("name", name).finish(),
        }
    }
}

#[derive(Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    Symbol(Symbol),
    Identifier(Rc<IdentifierData>),
    Pair(Rc<PairData>),
    Operative(Rc<OperativeData>),
    /// Wraps an underlying Operative (or another Wrapper); the
    /// underlying is held by `Rc<Value>` rather than a narrower type so
    /// that stacking (`wrap (wrap op)`) is just another `Value` to hold.
    Wrapper(Rc<Value>),
    /// Not reader-syntax, not user-constructible: the capability that
    /// lets an environment travel as a value, for the calling-environment
    /// binding of `operative` and for the `evaluate` builtin's second
    /// argument.
    Env(Rc<Environment>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(Rc::from(s.into()))
    }

    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new(PairData { car, cdr }))
    }

    /// Build a Nil-terminated list from a Rust vector, right to left.
    pub fn list(items: impl IntoIterator<Item = Value, IntoIter: DoubleEndedIterator>) -> Value {
        let mut result = Value::Nil;
        for item in items.into_iter().rev() {
            result = Value::cons(item, result);
        }
        result
    }

    pub fn is_truthy_boolean(&self) -> Result<bool, EvalError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(EvalError::TypeError(format!(
                "expected Boolean, got {}",
                other.type_name()
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Identifier(_) => "Identifier",
            Value::Pair(_) => "Pair",
            Value::Operative(_) => "Operative",
            Value::Wrapper(_) => "Wrapper",
            Value::Env(_) => "Environment",
        }
    }

    /// Iterate a Nil-terminated Pair chain as a sequence of `&Value`
    /// car slots. Stops (without error) at the first non-Pair cdr;
    /// callers that need to reject improper lists check the tail
    /// explicitly via `list_tail`.
    pub fn iter_list(&self) -> ListIter<'_> {
        ListIter { cursor: self }
    }

    /// Walks to the end of a Pair chain and returns what terminates it
    /// (Nil for a proper list, any other Value for an improper one).
    pub fn list_tail(&self) -> &Value {
        let mut cursor = self;
        while let Value::Pair(p) = cursor {
            cursor = &p.cdr;
        }
        cursor
    }

    pub fn list_len(&self) -> usize {
        self.iter_list().count()
    }

    pub fn as_pair(&self) -> Option<&PairData> {
        match self {
            Value::Pair(p) => Some(p),
            _ => None,
        }
    }
}

pub struct ListIter<'a> {
    cursor: &'a Value,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        match self.cursor {
            Value::Pair(p) => {
                let car = &p.car;
                self.cursor = &p.cdr;
                Some(car)
            }
            _ => None,
        }
    }
}

/// Deep structural equality: Pairs compare element-wise, Symbols compare
/// by interned identity, everything else compares by underlying value.
/// This is spec's `=`, and is deliberately not derived `PartialEq` —
/// the original this language was distilled from used Python's default
/// (identity) equality for pairs, but the redesigned rule here is
/// structural.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Integer(x), Value::Float(y)) | (Value::Float(y), Value::Integer(x)) => {
            *x as f64 == *y
        }
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => Rc::ptr_eq(x, y),
        (Value::Identifier(x), Value::Identifier(y)) => x.name == y.name,
        (Value::Pair(x), Value::Pair(y)) => {
            values_equal(&x.car, &y.car) && values_equal(&x.cdr, &y.cdr)
        }
        (Value::Wrapper(x), Value::Wrapper(y)) => values_equal(x, y),
        (Value::Operative(x), Value::Operative(y)) => Rc::ptr_eq(x, y),
        (Value::Env(x), Value::Env(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(true) => write!(f, "true"),
            Value::Boolean(false) => write!(f, "false"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Symbol(s) => write!(f, ":{}", s.name),
            Value::Identifier(id) => write!(f, "{}", id.name),
            Value::Pair(_) => {
                write!(f, "(")?;
                let mut cursor = self;
                let mut first = true;
                loop {
                    match cursor {
                        Value::Pair(p) => {
                            if !first {
                                write!(f, " ")?;
                            }
                            first = false;
                            write!(f, "{}", p.car)?;
                            cursor = &p.cdr;
                        }
                        Value::Nil => break,
                        other => {
                            write!(f, " . {}", other)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
            Value::Operative(op) => match op.as_ref() {
                OperativeData::Host { name, .. } => write!(f, "#<builtin:{}>", name),
                OperativeData::User { .. } => write!(f, "#<operative>"),
            },
            Value::Wrapper(_) => write!(f, "#<wrapper>"),
            Value::Env(_) => write!(f, "#<environment>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_interning_is_pointer_identity() {
        let a = intern("foo");
        let b = intern("foo");
        assert!(Rc::ptr_eq(&a, &b));
        let c = intern("bar");
        assert!(!Rc::ptr_eq(&a, &c));
    }

    #[test]
    fn nil_and_boolean_display() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Boolean(false).to_string(), "false");
    }

    #[test]
    fn float_display_round_trips_as_float() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
    }

    #[test]
    fn list_display() {
        let list = Value::list(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        assert_eq!(list.to_string(), "(1 2 3)");
        assert_eq!(Value::Nil.to_string(), "nil");
    }

    #[test]
    fn improper_list_display() {
        let pair = Value::cons(Value::Integer(1), Value::Integer(2));
        assert_eq!(pair.to_string(), "(1 . 2)");
    }

    #[test]
    fn deep_equality_for_pairs_identity_for_symbols() {
        let a = Value::list(vec![Value::Integer(1), Value::Symbol(intern("x"))]);
        let b = Value::list(vec![Value::Integer(1), Value::Symbol(intern("x"))]);
        assert!(values_equal(&a, &b));

        let c = Value::list(vec![Value::Integer(1), Value::Symbol(intern("y"))]);
        assert!(!values_equal(&a, &c));
    }

    #[test]
    fn integer_and_float_compare_numerically_equal() {
        assert!(values_equal(&Value::Integer(3), &Value::Float(3.0)));
    }
}
