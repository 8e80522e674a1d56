//! Bootstrap library
//!
//! Derived list operations (`length`, `last`, `elem?`, `map`, `foldr`,
//! `append`, `remove`, `unique`, `reverse`, `flatten`) are defined in the
//! language itself and loaded through the ordinary reader and evaluator.

use schemer_core::{Result, Value};

use crate::interpreter::Interpreter;

/// Source text of the bootstrap library: a single `begin` form.
pub const SOURCE: &str = include_str!("prelude.scm");

/// Evaluate the bootstrap library in `interp`'s global frame.
pub fn load(interp: &Interpreter) -> Result<Value> {
    interp.parse(SOURCE)
}
