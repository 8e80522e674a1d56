//! Core language definition for schemer
//!
//! This crate contains the values, environments, symbol table, and reader
//! for the schemer language. It does not evaluate anything - the analyzing
//! evaluator and the primitive library live in the `schemer` crate.

pub mod environment;
pub mod error;
pub mod interner;
pub mod language;
pub mod lexer;
pub mod parser;

// Re-export commonly used items for convenience
pub use environment::Environment;
pub use error::{Error, ErrorKind, Result};
pub use interner::Symbol;
pub use language::{Executable, Primitive, PrimitiveFn, Procedure, Value};
pub use parser::{Reader, read, read_all};
