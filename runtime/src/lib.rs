//! schemer runtime - analyzing evaluator and primitive library
//!
//! This crate provides the execution side of schemer:
//! - Analyzing evaluator (expression -> closure, then closure -> value)
//! - Primitive library and the bootstrap library written in schemer
//! - A register machine substrate

pub mod interpreter;
pub mod machine;
pub mod prelude;
pub mod stdlib;

// Re-export interpreter entry points
pub use interpreter::{Interpreter, analyze, apply, eval, global_env, load_prelude, parse};

// Re-export stdlib registration
pub use stdlib::register_stdlib;

pub use machine::{Contents, Instruction, Machine, Register, Stack};

// Reader and value model come from the core crate
pub use schemer_core::{Environment, Error, ErrorKind, Result, Symbol, Value, read};
