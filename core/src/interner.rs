//! Process-wide symbol table
//!
//! Every symbol the reader produces goes through this table, so two symbols
//! with the same name always share one identity and compare in O(1).
//! The table is created lazily on first use and never torn down.

use once_cell::sync::Lazy;
use std::fmt;
use std::sync::RwLock;
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

static SYMBOL_TABLE: Lazy<RwLock<StringInterner<DefaultBackend>>> =
    Lazy::new(|| RwLock::new(StringInterner::default()));

/// An interned symbol. Equality is identity, not content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(DefaultSymbol);

impl Symbol {
    /// Intern `name`, returning the identity already assigned to it if any.
    pub fn intern(name: &str) -> Self {
        // Fast path: most lookups hit names that are already interned.
        if let Some(sym) = SYMBOL_TABLE.read().unwrap().get(name) {
            return Symbol(sym);
        }
        let mut table = SYMBOL_TABLE.write().unwrap();
        Symbol(table.get_or_intern(name))
    }

    /// Resolve the symbol back to an owned copy of its name
    pub fn resolve(&self) -> String {
        self.with_str(str::to_string)
    }

    /// Run `f` against the symbol's name without allocating
    pub fn with_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let table = SYMBOL_TABLE.read().unwrap();
        let name = table
            .resolve(self.0)
            .expect("interned symbols are never removed");
        f(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| write!(f, "{s}"))
    }
}
