// ABOUTME: Error types for evaluation failures in the Lisp interpreter

use thiserror::Error;

/// An evaluation-phase error. Each variant's `Display` renders as
/// `"{Tag}: {message}"`, which is the wire format `throws?` parses back
/// apart on the first `:`.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    #[error("TypeError: {0}")]
    TypeError(String),

    #[error("ArgumentError: {0}")]
    ArgumentError(String),

    #[error("DefineError: {0}")]
    DefineError(String),

    #[error("AlreadyDefinedError: {0}")]
    AlreadyDefinedError(String),

    #[error("NotImplementedError: {0}")]
    NotImplementedError(String),

    #[error("UndefinedIdentifierError: {0}")]
    UndefinedIdentifierError(String),

    #[error("AssertionError: {0}")]
    AssertionError(String),

    #[error("KeyError: {0}")]
    KeyError(String),

    #[error("UnwrapError: {0}")]
    UnwrapError(String),

    /// Reader-phase failure. Not one of spec's evaluator-error tags, but
    /// needs a tag of its own so `throws?` can catch a failed `read`.
    #[error("ReadError: {0}")]
    ReadError(String),
}

impl EvalError {
    /// The tag `throws?` matches against: everything before the first
    /// `:`, or the whole message if there is no `:`.
    pub fn tag(&self) -> &str {
        let full = match self {
            EvalError::TypeError(_) => "TypeError",
            EvalError::ArgumentError(_) => "ArgumentError",
            EvalError::DefineError(_) => "DefineError",
            EvalError::AlreadyDefinedError(_) => "AlreadyDefinedError",
            EvalError::NotImplementedError(_) => "NotImplementedError",
            EvalError::UndefinedIdentifierError(_) => "UndefinedIdentifierError",
            EvalError::AssertionError(_) => "AssertionError",
            EvalError::KeyError(_) => "KeyError",
            EvalError::UnwrapError(_) => "UnwrapError",
            EvalError::ReadError(_) => "ReadError",
        };
        full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_tag_colon_message() {
        let e = EvalError::TypeError("expected Integer".to_string());
        assert_eq!(e.to_string(), "TypeError: expected Integer");
        assert_eq!(e.tag(), "TypeError");
    }

    #[test]
    fn tag_matches_the_prefix_throws_checks() {
        let e = EvalError::UndefinedIdentifierError("foo".to_string());
        let rendered = e.to_string();
        let prefix = rendered.split(':').next().unwrap();
        assert_eq!(prefix, e.tag());
    }
}
