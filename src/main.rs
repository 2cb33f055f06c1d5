// ABOUTME: CLI entry point: REPL and script-file execution for mini

mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod parser;
mod sandbox;
mod value;

use clap::Parser;
use config::FsConfig;
use env::Environment;
use eval::evaluate_expressions;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use sandbox::Sandbox;
use std::path::PathBuf;
use std::rc::Rc;
use value::Value;

/// A small Lisp of first-class operatives (vau-calculus), with a
/// capability-sandboxed file I/O surface.
#[derive(Parser, Debug)]
#[command(name = "mini")]
#[command(version = config::VERSION)]
#[command(about = "A vau-calculus Lisp interpreter")]
#[command(long_about = "An interpreter for mini, a small Lisp whose defining feature is \
first-class operatives: user-definable special forms that receive their \
argument expressions unevaluated, together with the caller's environment.")]
struct CliArgs {
    /// Script file to execute (omit to start the REPL).
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Arguments passed through to the script as `__arguments__`.
    #[arg(trailing_var_arg = true)]
    extra: Vec<String>,

    /// Add an allowed filesystem root for read-file/write-file (repeatable).
    #[arg(long = "fs-sandbox", value_name = "PATH", action = clap::ArgAction::Append)]
    fs_paths: Vec<PathBuf>,

    /// Maximum file size in bytes accepted by read-file/write-file.
    #[arg(
        long = "max-file-size",
        value_name = "BYTES",
        default_value = "10485760"
    )]
    max_file_size: usize,

    /// Skip loading predefineds.mini even if it is present.
    #[arg(long = "no-prelude")]
    no_prelude: bool,
}

const HISTORY_FILE: &str = ".mini_history";
const PRELUDE_FILENAME: &str = "predefineds.mini";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let fs_config = build_fs_config(&args);
    let sandbox = Sandbox::new(fs_config)?;

    let root = Environment::new();
    builtins::register_all(&root, Rc::new(sandbox));

    // The prelude sits between the builtin root and any user scope
    // (§6). Loading is best-effort: a missing or broken prelude is a
    // warning, never a fatal startup error, matching the original's
    // `try/except: traceback.print_exc()` around this same step.
    let prelude = Environment::nest(&root);
    if !args.no_prelude {
        load_prelude_if_present(&prelude);
    }

    if let Some(script_path) = args.script {
        let exit_code = run_script(&script_path, &prelude, &args.extra);
        std::process::exit(exit_code);
    }

    run_repl(&prelude);
    Ok(())
}

fn build_fs_config(args: &CliArgs) -> FsConfig {
    if args.fs_paths.is_empty() {
        FsConfig::default()
    } else {
        FsConfig {
            allowed_paths: args.fs_paths.clone(),
            max_file_size: args.max_file_size,
        }
    }
}

fn load_prelude_if_present(env: &Rc<Environment>) {
    let path = match std::env::current_exe() {
        Ok(exe) => exe.with_file_name(PRELUDE_FILENAME),
        Err(_) => PathBuf::from(PRELUDE_FILENAME),
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(_) => return,
    };

    if let Err(e) = parser::parse(&source).and_then(|program| evaluate_expressions(&program, env))
    {
        eprintln!("Warning: failed to load prelude {}: {}", path.display(), e);
    }
}

/// Execute a script file in a fresh scope nested under `prelude`,
/// with `__file__` and `__arguments__` bound per §6. Returns the
/// process exit code.
fn run_script(path: &PathBuf, prelude: &Rc<Environment>, extra_args: &[String]) -> i32 {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Cannot read script file {}: {}", path.display(), e);
            return 1;
        }
    };

    let script_env = Environment::nest(prelude);

    let absolute_path = std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.clone())
        .to_string_lossy()
        .into_owned();
    script_env.bind("__file__", Value::string(absolute_path));
    script_env.bind(
        "__arguments__",
        Value::list(
            extra_args
                .iter()
                .cloned()
                .map(Value::string)
                .collect::<Vec<_>>(),
        ),
    );

    match parser::parse(&contents).and_then(|program| evaluate_expressions(&program, &script_env))
    {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Interactive REPL: reads one line at a time, evaluates it in a fresh
/// scope nested under `prelude`, and prints the result. Errors print and
/// the loop continues (§6: "Errors print a traceback and continue").
fn run_repl(prelude: &Rc<Environment>) {
    let repl_env = Environment::nest(prelude);

    println!("{}", config::WELCOME_MESSAGE);
    println!("{}", config::WELCOME_SUBTITLE);

    let rl_config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), rustyline::history::DefaultHistory> = match Editor::with_config(rl_config)
    {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize REPL: {}", e);
            return;
        }
    };
    let _ = rl.load_history(HISTORY_FILE);

    loop {
        match rl.readline(config::PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                // A couple of REPL-only commands, checked before the line
                // is handed to the reader (same spot the teacher's REPL
                // intercepts `(quit)`/`(clear)`).
                match line.trim() {
                    "(help)" | "help" => {
                        println!("{}", config::HELP_TEXT);
                        continue;
                    }
                    _ => {}
                }

                match parser::parse(&line).and_then(|program| evaluate_expressions(&program, &repl_env))
                {
                    Ok(result) => println!("{}", result),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_fs_config_falls_back_to_default_when_no_paths_given() {
        let args = CliArgs {
            script: None,
            extra: vec![],
            fs_paths: vec![],
            max_file_size: 10485760,
            no_prelude: false,
        };
        let config = build_fs_config(&args);
        assert_eq!(config, FsConfig::default());
    }

    #[test]
    fn build_fs_config_uses_provided_paths() {
        let args = CliArgs {
            script: None,
            extra: vec![],
            fs_paths: vec![PathBuf::from("/tmp/safe")],
            max_file_size: 4096,
            no_prelude: false,
        };
        let config = build_fs_config(&args);
        assert_eq!(config.allowed_paths, vec![PathBuf::from("/tmp/safe")]);
        assert_eq!(config.max_file_size, 4096);
    }

    #[test]
    fn script_mode_binds_file_and_arguments() {
        let root = Environment::new();
        builtins::register_all(&root, Rc::new(Sandbox::new(FsConfig::default()).unwrap()));
        let prelude = Environment::nest(&root);

        let dir = std::env::temp_dir().join(format!("mini-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script_path = dir.join("script.mini");
        std::fs::write(&script_path, "(define got __arguments__) (define f __file__)").unwrap();

        let exit_code = run_script(
            &script_path,
            &prelude,
            &["a".to_string(), "b".to_string()],
        );
        assert_eq!(exit_code, 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn script_mode_returns_nonzero_on_evaluation_error() {
        let root = Environment::new();
        builtins::register_all(&root, Rc::new(Sandbox::new(FsConfig::default()).unwrap()));
        let prelude = Environment::nest(&root);

        let dir = std::env::temp_dir().join(format!("mini-test-err-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script_path = dir.join("broken.mini");
        std::fs::write(&script_path, "(undefined-name)").unwrap();

        let exit_code = run_script(&script_path, &prelude, &[]);
        assert_eq!(exit_code, 1);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
