use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use schemer::{ErrorKind, Interpreter};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

const HISTORY_FILE: &str = ".schemer_history";

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE))
}

// An unclosed paren means the user is still typing
fn is_incomplete(source: &str) -> bool {
    match schemer_core::read_all(source) {
        Err(e) => e.kind == ErrorKind::Syntax && e.message == "Unclosed parenthesis",
        Ok(_) => false,
    }
}

fn repl() -> Result<(), String> {
    let interp = Interpreter::with_prelude()?;
    let mut rl = DefaultEditor::new().map_err(|e| format!("Could not start REPL: {e}"))?;
    let history = history_path();
    if let Some(path) = &history {
        // A missing history file just means a first run
        let _ = rl.load_history(path);
    }

    println!("schemer REPL");
    println!("Type expressions to evaluate, or :quit to exit");
    println!();

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "> " } else { "... " };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(format!("Read error: {e}")),
        };

        let trimmed = line.trim();
        if buffer.is_empty() {
            if trimmed.is_empty() {
                continue;
            }
            if matches!(trimmed, ":quit" | ":exit" | "(exit)") {
                break;
            }
        }

        buffer.push_str(&line);
        buffer.push('\n');
        if is_incomplete(&buffer) {
            continue;
        }

        let _ = rl.add_history_entry(buffer.trim());
        match interp.eval_source(&buffer) {
            Ok(result) => println!("{result}"),
            Err(e) => eprintln!("Error: {e}"),
        }
        buffer.clear();
    }

    if let Some(path) = &history {
        let _ = rl.save_history(path);
    }
    Ok(())
}

fn run_file(filename: &str) -> Result<(), String> {
    let contents = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{filename}': {e}"))?;

    let interp = Interpreter::with_prelude()?;
    let result = interp
        .eval_source(&contents)
        .map_err(|e| format!("Evaluation error: {e}"))?;
    println!("{result}");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  schemer             Start interactive REPL");
    eprintln!("  schemer <file.scm>  Run a schemer file");
    eprintln!("  schemer --help      Show this help message");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let outcome = match args.len() {
        1 => repl(),
        2 if args[1] == "--help" || args[1] == "-h" => {
            print_usage();
            Ok(())
        }
        2 => run_file(&args[1]),
        _ => {
            eprintln!("Error: Too many arguments");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("{e}");
        process::exit(1);
    }
}
