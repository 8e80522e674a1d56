use std::fmt;
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::Result;
use crate::interner::Symbol;

// ============================================================================
// Core Type System
// ============================================================================

/// An analyzed expression: runs against an environment chain and yields a value.
pub type Executable = Rc<dyn Fn(&Environment) -> Result<Value>>;

/// Native function type - Rust functions callable from the language
pub type PrimitiveFn = fn(&[Value]) -> Result<Value>;

/// A host-implemented procedure, created once when the global frame is built.
#[derive(Clone, Copy, Debug)]
pub struct Primitive {
    pub name: &'static str,
    pub func: PrimitiveFn,
}

impl Primitive {
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }
}

/// A closure produced by evaluating a `lambda` form.
///
/// `env` is the chain that was current when the lambda was evaluated. It is
/// shared, not copied, so later `define`/`set!` on those frames are visible
/// when the procedure runs.
pub struct Procedure {
    pub params: Rc<[Symbol]>,
    pub body: Executable,
    pub env: Environment,
}

// Manual implementation since the body is an opaque closure
impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("params", &self.params)
            .field("body", &"<analyzed>")
            .field("env", &self.env)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(Rc<str>),
    Symbol(Symbol),
    /// Ordered sequence; the empty sequence is the canonical nil.
    List(Rc<Vec<Value>>),
    Primitive(Primitive),
    Procedure(Rc<Procedure>),
    /// "No value": `(car '())`, unfilled parameters, `alert`, a missing `if` branch.
    Undefined,
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    /// The empty sequence
    pub fn nil() -> Self {
        Value::List(Rc::new(Vec::new()))
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::intern(name))
    }

    pub fn text(s: &str) -> Self {
        Value::Text(Rc::from(s))
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Value::Symbol(sym) => Some(*sym),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Everything except the literal `#f` counts as true.
    pub fn is_true(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Value::List(items) if !items.is_empty())
    }

    /// Identity comparison used by `eq?`: atoms by value, symbols by interned
    /// identity, sequences and procedures by reference.
    pub fn is_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Primitive(a), Value::Primitive(b)) => a.name == b.name,
            (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
            (Value::Undefined, Value::Undefined) => true,
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Primitive(_) => "primitive",
            Value::Procedure(_) => "procedure",
            Value::Undefined => "undefined",
        }
    }
}

// Structural equality, so hosts and tests can compare whole trees.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || a == b,
            _ => self.is_eq(other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::Number(n) => write!(f, "{n}"),
            // Text keeps its escapes verbatim, so this reads back unchanged
            Value::Text(s) => write!(f, "\"{s}\""),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Primitive(p) => write!(f, "#<primitive {}>", p.name),
            Value::Procedure(_) => write!(f, "#<procedure>"),
            Value::Undefined => write!(f, "#<undefined>"),
        }
    }
}
