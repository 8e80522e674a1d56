//! Primitive library
//!
//! Host-implemented procedures bound in the global frame. Primitives are not
//! arity-checked by the evaluator: a missing argument reads as
//! `Value::Undefined` and extra arguments are ignored unless the primitive
//! folds over all of them.

use schemer_core::{Environment, Error, Primitive, PrimitiveFn, Result, Symbol, Value};

/// Every primitive, by the name it is bound to
const PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("+", add),
    ("-", sub),
    ("*", mul),
    ("/", div),
    ("%", rem),
    ("cons", cons),
    ("car", car),
    ("cdr", cdr),
    ("list", list),
    ("chr", chr),
    ("eq?", is_eq),
    ("null?", is_null),
    ("pair?", is_pair),
    ("alert", alert),
];

/// Bind every primitive in `env`'s innermost frame.
pub fn register_stdlib(env: &Environment) {
    for &(name, func) in PRIMITIVES {
        env.define(
            Symbol::intern(name),
            Value::Primitive(Primitive { name, func }),
        );
    }
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Left fold with the first argument as the accumulator; `seed` is only the
/// result of calling with no arguments at all.
fn fold(op: &str, args: &[Value], seed: f64, f: fn(f64, f64) -> f64) -> Result<Value> {
    let mut numbers = args.iter().map(|value| {
        value
            .as_number()
            .ok_or_else(|| Error::wrong_type(op, "number", value))
    });
    let Some(first) = numbers.next() else {
        return Ok(Value::Number(seed));
    };
    let mut acc = first?;
    for n in numbers {
        acc = f(acc, n?);
    }
    Ok(Value::Number(acc))
}

/// Usage: (+ 1 2 3) => 6, (+) => 0
pub fn add(args: &[Value]) -> Result<Value> {
    fold("+", args, 0.0, |a, b| a + b)
}

/// Usage: (- 3 2) => 1, (- 10 1 2) => 7
pub fn sub(args: &[Value]) -> Result<Value> {
    fold("-", args, 0.0, |a, b| a - b)
}

/// Usage: (* 3 5) => 15, (*) => 1
pub fn mul(args: &[Value]) -> Result<Value> {
    fold("*", args, 1.0, |a, b| a * b)
}

/// Usage: (/ 15 3) => 5
pub fn div(args: &[Value]) -> Result<Value> {
    fold("/", args, 0.0, |a, b| a / b)
}

/// Remainder with the sign of the dividend. Usage: (% 11 10) => 1
pub fn rem(args: &[Value]) -> Result<Value> {
    fold("%", args, 0.0, |a, b| a % b)
}

// ============================================================================
// Lists
// ============================================================================

/// Prepend to a list, or build a two-element list when `y` is not a list.
/// Usage: (cons 1 '(2 3)) => (1 2 3), (cons 1 2) => (1 2)
pub fn cons(args: &[Value]) -> Result<Value> {
    let head = arg(args, 0);
    match arg(args, 1) {
        Value::List(tail) => {
            let mut items = Vec::with_capacity(tail.len() + 1);
            items.push(head);
            items.extend(tail.iter().cloned());
            Ok(Value::list(items))
        }
        other => Ok(Value::list(vec![head, other])),
    }
}

/// Usage: (car '(1 2)) => 1, (car '()) => #<undefined>
pub fn car(args: &[Value]) -> Result<Value> {
    let value = arg(args, 0);
    match value.as_list() {
        Some(items) => Ok(items.first().cloned().unwrap_or(Value::Undefined)),
        None => Err(Error::wrong_type("car", "list", &value)),
    }
}

/// Usage: (cdr '(1 2 3)) => (2 3), (cdr '()) => ()
pub fn cdr(args: &[Value]) -> Result<Value> {
    let value = arg(args, 0);
    match value.as_list() {
        Some(items) => Ok(Value::list(items.iter().skip(1).cloned().collect())),
        None => Err(Error::wrong_type("cdr", "list", &value)),
    }
}

/// Usage: (list 1 2 3) => (1 2 3)
pub fn list(args: &[Value]) -> Result<Value> {
    Ok(Value::list(args.to_vec()))
}

// ============================================================================
// Text
// ============================================================================

/// Single-character text from a code point. Usage: (chr 97) => "a"
pub fn chr(args: &[Value]) -> Result<Value> {
    let value = arg(args, 0);
    let c = value
        .as_number()
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= u32::MAX as f64)
        .and_then(|n| char::from_u32(n.trunc() as u32))
        .ok_or_else(|| Error::wrong_type("chr", "a code point", &value))?;
    Ok(Value::Text(c.to_string().into()))
}

// ============================================================================
// Predicates
// ============================================================================

/// Usage: (eq? 'a 'a) => #t, (eq? '(1) '(1)) => #f
pub fn is_eq(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(arg(args, 0).is_eq(&arg(args, 1))))
}

/// Usage: (null? '()) => #t
pub fn is_null(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(arg(args, 0).is_null()))
}

/// Usage: (pair? '(1)) => #t, (pair? '()) => #f
pub fn is_pair(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(arg(args, 0).is_pair()))
}

// ============================================================================
// Host I/O
// ============================================================================

/// Show a value to the user. Text is printed without quotes.
pub fn alert(args: &[Value]) -> Result<Value> {
    match arg(args, 0) {
        Value::Text(s) => println!("{s}"),
        other => println!("{other}"),
    }
    Ok(Value::Undefined)
}
