//! Environment for variable bindings
//!
//! An Environment is a handle to the innermost frame of a chain. Each frame
//! points at the frame that encloses it, ending at the global frame. Frames
//! are shared: every closure created while a frame was innermost holds the
//! same frame, so `define` and `set!` through one handle are visible through
//! all of them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::interner::Symbol;
use crate::language::Value;

// ============================================================================
// Environment
// ============================================================================

// One scope level and a pointer to the scope enclosing it
struct Frame {
    bindings: FxHashMap<Symbol, Value>,
    parent: Option<Environment>,
}

/// Environment chain. Cloning is an Rc increment and shares the frames.
#[derive(Clone)]
pub struct Environment {
    frame: Rc<RefCell<Frame>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a chain holding a single, empty (global) frame
    pub fn new() -> Self {
        Environment {
            frame: Rc::new(RefCell::new(Frame {
                bindings: FxHashMap::default(),
                parent: None,
            })),
        }
    }

    /// Prepend a frame binding `params` positionally to `args`.
    ///
    /// Extra arguments are dropped; parameters without an argument are bound
    /// to `Value::Undefined`.
    pub fn extend(&self, params: &[Symbol], args: &[Value]) -> Self {
        let mut bindings = FxHashMap::default();
        for (i, param) in params.iter().enumerate() {
            let arg = args.get(i).cloned().unwrap_or(Value::Undefined);
            bindings.insert(*param, arg);
        }

        Environment {
            frame: Rc::new(RefCell::new(Frame {
                bindings,
                parent: Some(self.clone()),
            })),
        }
    }

    /// Bind `name` in the innermost frame, shadowing any outer binding.
    pub fn define(&self, name: Symbol, value: Value) {
        self.frame.borrow_mut().bindings.insert(name, value);
    }

    /// Look up a variable, walking outward from the innermost frame
    pub fn lookup(&self, name: Symbol) -> Result<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let frame = current.frame.borrow();
                if let Some(value) = frame.bindings.get(&name) {
                    return Ok(value.clone());
                }
                frame.parent.clone()
            };
            match next {
                Some(parent) => current = parent,
                None => return Err(Error::unbound(name)),
            }
        }
    }

    /// Overwrite the binding in the nearest frame that already has `name`.
    /// Never creates a binding.
    pub fn set(&self, name: Symbol, value: Value) -> Result<()> {
        let mut current = self.clone();
        loop {
            let next = {
                let mut frame = current.frame.borrow_mut();
                if let Some(slot) = frame.bindings.get_mut(&name) {
                    *slot = value;
                    return Ok(());
                }
                frame.parent.clone()
            };
            match next {
                Some(parent) => current = parent,
                None => return Err(Error::unbound(name)),
            }
        }
    }

    /// Does the innermost frame bind `name`?
    pub fn is_bound_locally(&self, name: Symbol) -> bool {
        self.frame.borrow().bindings.contains_key(&name)
    }

    /// Number of frames in the chain, global frame included
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut parent = self.frame.borrow().parent.clone();
        while let Some(env) = parent {
            depth += 1;
            parent = env.frame.borrow().parent.clone();
        }
        depth
    }

    /// Do both handles point at the same innermost frame?
    pub fn same_frame(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.frame, &other.frame)
    }

    /// Names bound in the innermost frame, sorted by name
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .frame
            .borrow()
            .bindings
            .keys()
            .map(Symbol::resolve)
            .collect();
        names.sort();
        names
    }
}

// Frames can be cyclic through closures, so only the shape is printed
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<environment depth={}>", self.depth())
    }
}
