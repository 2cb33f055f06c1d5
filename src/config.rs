// ABOUTME: Configuration and constants for the mini interpreter
// This module contains version info, REPL banner text, and the filesystem sandbox config

use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "mini";
pub const WELCOME_SUBTITLE: &str = "a small vau-calculus Lisp";
pub const PROMPT: &str = ">>> ";

/// Filesystem sandbox configuration backing the `read-file`/`write-file`
/// builtins. `allowed_paths` are tried in order for reads; writes always
/// target the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsConfig {
    pub allowed_paths: Vec<PathBuf>,
    pub max_file_size: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            allowed_paths: vec![PathBuf::from(".")],
            // Default max file size: 10MB
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

pub const HELP_TEXT: &str = r#"
mini is a small Lisp of first-class operatives (vau-calculus, after
John N. Shutt). Every call form is an unevaluated operative invocation
unless the operative has been wrapped into an applicative with `wrap`.

Special forms:    define if operative assert throws? defined?
Data:             cons car cdr length slice concatenate
Arithmetic:       + - * / // mod
Comparison:       = < > <= >=
Callables:        wrap unwrap
Meta:             read evaluate identifier->symbol
I/O:              print prompt read-file write-file
Dictionaries:     cons-dict-set cons-dict-get

Use Ctrl-D to exit the REPL.
"#;
