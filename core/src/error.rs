//! Error types shared by the reader, the evaluator, and the register machine.

use std::fmt;

use crate::interner::Symbol;
use crate::language::Value;

/// Categories of failure. Every error aborts the current top-level form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed token stream, unbalanced parentheses, or a malformed special form
    Syntax,
    /// Lookup or `set!` of a name that no frame in the chain binds
    UnboundVariable,
    /// Application of something that is neither a primitive nor a procedure
    NotCallable,
    /// A `begin` or lambda body with no expressions
    EmptySequence,
    /// A primitive received an argument of the wrong kind
    WrongType,
    /// Misuse of the register machine
    Machine,
}

/// An error with a human-readable message and, optionally, the form it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The category of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The offending expression, rendered in source syntax
    pub expression: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            message: message.into(),
            expression: None,
        }
    }

    /// Attach the expression that caused the error.
    pub fn with_expression(mut self, expr: &Value) -> Self {
        self.expression = Some(expr.to_string());
        self
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn unbound(name: Symbol) -> Self {
        Self::new(
            ErrorKind::UnboundVariable,
            format!("Unbound variable: {name}"),
        )
    }

    pub fn not_callable(value: &Value) -> Self {
        Self::new(
            ErrorKind::NotCallable,
            format!("Unknown procedure type: {value}"),
        )
    }

    pub fn empty_sequence() -> Self {
        Self::new(ErrorKind::EmptySequence, "Empty sequence")
    }

    /// `op` received `value` where it expected `expected`
    pub fn wrong_type(op: &str, expected: &str, value: &Value) -> Self {
        Self::new(
            ErrorKind::WrongType,
            format!("{op}: expected {expected}, got {value}"),
        )
    }

    pub fn machine(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Machine, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref expr) = self.expression {
            let truncated = if expr.chars().count() > 60 {
                let head: String = expr.chars().take(57).collect();
                format!("{head}...")
            } else {
                expr.clone()
            };
            write!(f, " in: {truncated}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<Error> for String {
    fn from(err: Error) -> String {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
