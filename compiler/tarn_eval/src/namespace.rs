//! The flat symbol table one interpreter evaluates against.
//!
//! There is a single namespace per interpreter. Procedure calls overlay
//! their parameters onto it and restore a snapshot afterwards (see
//! `interpreter::namespace_guard`), so there is no scope chain to walk.
//!
//! Names reaching the table from a script are validated: they must be
//! identifiers and must not be reserved words. The builtins seeded at
//! construction (`print` among them) go in unchecked.

use rustc_hash::FxHashMap;

use tarn_ir::Ident;

use crate::errors::{invalid_symbol_name, name_not_defined, EvalError};
use crate::value::Value;

/// Names a script may never bind.
pub const RESERVED_WORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "exec", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "nonlocal", "not", "or", "pass", "print", "raise", "return", "try", "while", "with",
    "yield", "True", "False", "None", "eval", "execfile", "__import__", "__package__",
];

/// Whether `name` is an identifier a script may bind.
pub fn valid_symbol_name(name: &str) -> bool {
    if RESERVED_WORDS.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Saved bindings, restored wholesale.
pub type Snapshot = FxHashMap<Ident, Value>;

#[derive(Clone, Default)]
pub struct Namespace {
    symbols: FxHashMap<Ident, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Namespace::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name)
    }

    /// Look up a name, failing with a name error when unbound.
    pub fn lookup(&self, name: &str) -> Result<Value, EvalError> {
        self.symbols
            .get(name)
            .cloned()
            .ok_or_else(|| name_not_defined(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Bind a validated name.
    pub fn define(&mut self, name: Ident, value: Value) -> Result<(), EvalError> {
        if !valid_symbol_name(&name) {
            return Err(invalid_symbol_name(&name));
        }
        self.symbols.insert(name, value);
        Ok(())
    }

    /// Bind without validation. Used for seeding and parameter overlay,
    /// where the names were checked elsewhere.
    pub fn insert(&mut self, name: Ident, value: Value) {
        self.symbols.insert(name, value);
    }

    pub fn remove(&mut self, name: &str) -> Result<Value, EvalError> {
        self.symbols
            .remove(name)
            .ok_or_else(|| name_not_defined(name))
    }

    /// All bound names, sorted.
    pub fn names(&self) -> Vec<Ident> {
        let mut names: Vec<Ident> = self.symbols.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.symbols.clone()
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.symbols = snapshot;
    }
}

#[cfg(test)]
mod tests;
