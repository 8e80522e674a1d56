//! Analyzing evaluator
//!
//! Evaluation happens in two steps. `analyze` walks an expression once and
//! turns it into an `Executable` closure; the closure can then be run
//! against any number of environment chains without looking at the
//! expression's syntax again. Lambda bodies are analyzed when the `lambda`
//! form is analyzed, not each time the procedure is called.

use std::rc::Rc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use schemer_core::parser::{QUOTE_MARK, Reader};
use schemer_core::{Environment, Error, Executable, Procedure, Result, Symbol, Value};

use crate::stdlib::register_stdlib;

// ============================================================================
// Special Forms
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialForm {
    Quote,
    If,
    Begin,
    Define,
    Set,
    Lambda,
    Cond,
    Let,
}

static SPECIAL_FORMS: Lazy<FxHashMap<Symbol, SpecialForm>> = Lazy::new(|| {
    [
        (QUOTE_MARK, SpecialForm::Quote),
        ("quote", SpecialForm::Quote),
        ("if", SpecialForm::If),
        ("begin", SpecialForm::Begin),
        ("define", SpecialForm::Define),
        ("set!", SpecialForm::Set),
        ("lambda", SpecialForm::Lambda),
        ("cond", SpecialForm::Cond),
        ("let", SpecialForm::Let),
    ]
    .into_iter()
    .map(|(name, form)| (Symbol::intern(name), form))
    .collect()
});

impl SpecialForm {
    fn from_symbol(sym: Symbol) -> Option<Self> {
        SPECIAL_FORMS.get(&sym).copied()
    }
}

fn executable<F>(f: F) -> Executable
where
    F: Fn(&Environment) -> Result<Value> + 'static,
{
    Rc::new(f)
}

// ============================================================================
// Analyzer
// ============================================================================

/// Analyze `expr` into a closure that evaluates it.
pub fn analyze(expr: &Value) -> Result<Executable> {
    match expr {
        Value::Symbol(name) => Ok(analyze_variable(*name)),
        Value::List(items) if !items.is_empty() => {
            match items[0].as_symbol().and_then(SpecialForm::from_symbol) {
                Some(form) => analyze_special_form(form, expr, items),
                None => analyze_application(items),
            }
        }
        // Booleans, numbers, text and the empty list evaluate to themselves
        _ => Ok(analyze_self_evaluating(expr.clone())),
    }
}

/// Analyze and run `expr` against `env`.
pub fn eval(expr: &Value, env: &Environment) -> Result<Value> {
    let proc = analyze(expr)?;
    proc(env)
}

fn analyze_special_form(form: SpecialForm, expr: &Value, items: &[Value]) -> Result<Executable> {
    let analyzed = match form {
        SpecialForm::Quote => analyze_quote(items),
        SpecialForm::If => analyze_if(items),
        SpecialForm::Begin => analyze_sequence(&items[1..]),
        SpecialForm::Define => analyze_define(items),
        SpecialForm::Set => analyze_set(items),
        SpecialForm::Lambda => analyze_lambda(items),
        SpecialForm::Cond => analyze_cond(items),
        SpecialForm::Let => analyze_let(items),
    };
    analyzed.map_err(|e| match e.expression {
        None => e.with_expression(expr),
        Some(_) => e,
    })
}

fn analyze_self_evaluating(value: Value) -> Executable {
    executable(move |_| Ok(value.clone()))
}

fn analyze_variable(name: Symbol) -> Executable {
    executable(move |env| env.lookup(name))
}

fn analyze_quote(items: &[Value]) -> Result<Executable> {
    let [_, datum] = items else {
        return Err(Error::syntax("quote: expected exactly one datum"));
    };
    Ok(analyze_self_evaluating(datum.clone()))
}

fn analyze_if(items: &[Value]) -> Result<Executable> {
    let (test, conseq, altern) = match items {
        [_, test, conseq] => (test, conseq, None),
        [_, test, conseq, altern] => (test, conseq, Some(altern)),
        _ => return Err(Error::syntax("if: expected (if test consequent [alternative])")),
    };

    let pproc = analyze(test)?;
    let cproc = analyze(conseq)?;
    let aproc = match altern {
        Some(altern) => analyze(altern)?,
        None => analyze_self_evaluating(Value::Undefined),
    };

    Ok(executable(move |env| {
        if pproc(env)?.is_true() {
            cproc(env)
        } else {
            aproc(env)
        }
    }))
}

/// Analyze a body: every expression in order, the value of the last one.
fn analyze_sequence(exprs: &[Value]) -> Result<Executable> {
    let mut procs = exprs.iter().map(analyze).collect::<Result<Vec<_>>>()?;
    let Some(last) = procs.pop() else {
        return Err(Error::empty_sequence());
    };
    if procs.is_empty() {
        return Ok(last);
    }

    Ok(executable(move |env| {
        for proc in &procs {
            proc(env)?;
        }
        last(env)
    }))
}

fn analyze_define(items: &[Value]) -> Result<Executable> {
    match items.get(1) {
        // (define (name arg...) body...) => (define name (lambda (arg...) body...))
        Some(Value::List(signature)) => {
            let Some((name, params)) = signature.split_first() else {
                return Err(Error::syntax("define: missing procedure name"));
            };
            let mut lambda = vec![Value::symbol("lambda"), Value::list(params.to_vec())];
            lambda.extend_from_slice(&items[2..]);
            let rewritten = Value::list(vec![
                Value::symbol("define"),
                name.clone(),
                Value::list(lambda),
            ]);
            analyze(&rewritten)
        }
        Some(Value::Symbol(name)) => {
            let [_, _, value_expr] = items else {
                return Err(Error::syntax(format!(
                    "define: expected (define {name} value)"
                )));
            };
            let name = *name;
            let vproc = analyze(value_expr)?;
            Ok(executable(move |env| {
                let value = vproc(env)?;
                env.define(name, value.clone());
                Ok(value)
            }))
        }
        _ => Err(Error::syntax("define: expected a symbol or (name arg...)")),
    }
}

fn analyze_set(items: &[Value]) -> Result<Executable> {
    let [_, Value::Symbol(name), value_expr] = items else {
        return Err(Error::syntax("set!: expected (set! symbol value)"));
    };
    let name = *name;
    let vproc = analyze(value_expr)?;
    Ok(executable(move |env| {
        let value = vproc(env)?;
        env.set(name, value.clone())?;
        Ok(value)
    }))
}

fn analyze_lambda(items: &[Value]) -> Result<Executable> {
    let Some(Value::List(param_list)) = items.get(1) else {
        return Err(Error::syntax("lambda: expected a parameter list"));
    };
    let params: Rc<[Symbol]> = param_list
        .iter()
        .map(|p| {
            p.as_symbol()
                .ok_or_else(|| Error::syntax(format!("lambda: parameter {p} is not a symbol")))
        })
        .collect::<Result<_>>()?;
    let body = analyze_sequence(&items[2..])?;

    Ok(executable(move |env| {
        Ok(Value::Procedure(Rc::new(Procedure {
            params: Rc::clone(&params),
            body: Rc::clone(&body),
            env: env.clone(),
        })))
    }))
}

// (cond (p1 e1) (p2 e2) ... (else en)) => (if p1 e1 (if p2 e2 (if ... en)))
fn analyze_cond(items: &[Value]) -> Result<Executable> {
    let else_sym = Symbol::intern("else");
    let mut expanded = Value::nil();

    for clause in items[1..].iter().rev() {
        let Some((test, body)) = clause.as_list().and_then(|c| c.split_first()) else {
            return Err(Error::syntax(format!("cond: malformed clause {clause}")));
        };
        let test = match test.as_symbol() {
            Some(sym) if sym == else_sym => Value::Bool(true),
            _ => test.clone(),
        };
        let consequent = match body {
            [] => return Err(Error::syntax(format!("cond: clause {clause} has no body"))),
            [single] => single.clone(),
            several => {
                let mut seq = vec![Value::symbol("begin")];
                seq.extend_from_slice(several);
                Value::list(seq)
            }
        };
        expanded = Value::list(vec![Value::symbol("if"), test, consequent, expanded]);
    }

    analyze(&expanded)
}

// (let ((v1 e1) (v2 e2) ...) body...) => ((lambda (v1 v2 ...) body...) e1 e2 ...)
fn analyze_let(items: &[Value]) -> Result<Executable> {
    let Some(bindings) = items.get(1).and_then(Value::as_list) else {
        return Err(Error::syntax("let: expected a list of bindings"));
    };

    let mut names = Vec::with_capacity(bindings.len());
    let mut values = Vec::with_capacity(bindings.len());
    for binding in bindings {
        match binding.as_list() {
            Some([name @ Value::Symbol(_), value]) => {
                names.push(name.clone());
                values.push(value.clone());
            }
            _ => {
                return Err(Error::syntax(format!(
                    "let: binding {binding} is not (name value)"
                )));
            }
        }
    }

    let mut lambda = vec![Value::symbol("lambda"), Value::list(names)];
    lambda.extend_from_slice(&items[2..]);
    let mut application = vec![Value::list(lambda)];
    application.extend(values);
    analyze(&Value::list(application))
}

fn analyze_application(items: &[Value]) -> Result<Executable> {
    let fproc = analyze(&items[0])?;
    let aprocs = items[1..].iter().map(analyze).collect::<Result<Vec<_>>>()?;

    Ok(executable(move |env| {
        let procedure = fproc(env)?;
        let args = aprocs
            .iter()
            .map(|aproc| aproc(env))
            .collect::<Result<Vec<_>>>()?;
        apply(&procedure, &args)
    }))
}

// ============================================================================
// Application
// ============================================================================

/// Apply a primitive or procedure to already-evaluated arguments.
pub fn apply(procedure: &Value, args: &[Value]) -> Result<Value> {
    match procedure {
        Value::Primitive(primitive) => primitive.call(args),
        Value::Procedure(closure) => {
            // The new frame extends the captured chain, not the caller's
            let env = closure.env.extend(&closure.params, args);
            (closure.body)(&env)
        }
        other => Err(Error::not_callable(other)),
    }
}

// ============================================================================
// Interpreter
// ============================================================================

/// Owns a global frame holding the primitive library. Every top-level
/// evaluation runs against a chain made of just that frame, so definitions
/// made by one call are visible to the next.
#[derive(Clone)]
pub struct Interpreter {
    global: Environment,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// A global environment with the primitives only
    pub fn new() -> Self {
        let global = Environment::new();
        register_stdlib(&global);
        Interpreter { global }
    }

    /// A global environment with the primitives and the bootstrap library
    pub fn with_prelude() -> Result<Self> {
        let interp = Self::new();
        crate::prelude::load(&interp)?;
        Ok(interp)
    }

    pub fn global_env(&self) -> &Environment {
        &self.global
    }

    /// Read one expression from `source` and evaluate it.
    pub fn parse(&self, source: &str) -> Result<Value> {
        let expr = schemer_core::read(source)?;
        self.eval(&expr)
    }

    pub fn eval(&self, expr: &Value) -> Result<Value> {
        eval(expr, &self.global)
    }

    /// Evaluate every top-level expression in `source`, returning the last value.
    pub fn eval_source(&self, source: &str) -> Result<Value> {
        let mut reader = Reader::new(source);
        let mut last = Value::Undefined;
        while let Some(expr) = reader.read_next()? {
            last = self.eval(&expr)?;
        }
        Ok(last)
    }
}

thread_local! {
    static GLOBAL: Interpreter = Interpreter::new();
}

/// Read one expression and evaluate it against this thread's global frame.
pub fn parse(source: &str) -> Result<Value> {
    GLOBAL.with(|interp| interp.parse(source))
}

/// Load the bootstrap library into this thread's global frame.
pub fn load_prelude() -> Result<Value> {
    parse(crate::prelude::SOURCE)
}

/// This thread's global environment
pub fn global_env() -> Environment {
    GLOBAL.with(|interp| interp.global_env().clone())
}
