//! RAII guard for procedure calls.
//!
//! A call overlays its parameters onto the one namespace. The guard takes a
//! snapshot when the call starts and puts it back when dropped, so the
//! caller's bindings come back on every exit path: normal return, early
//! `return`, a propagated failure, or unwinding. It also holds one level of
//! call depth for its lifetime.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`, so
//! the body runs through it like through the interpreter itself.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::errors::EvalError;
use crate::namespace::Snapshot;

pub struct NamespaceGuard<'a> {
    interpreter: &'a mut Interpreter,
    saved: Option<Snapshot>,
}

impl Drop for NamespaceGuard<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.interpreter.namespace.restore(saved);
        }
        self.interpreter.governor.exit_call();
    }
}

impl Deref for NamespaceGuard<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for NamespaceGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Enter a procedure frame. Fails when the call depth ceiling is hit.
    pub fn enter_procedure(&mut self) -> Result<NamespaceGuard<'_>, EvalError> {
        self.governor.enter_call()?;
        let saved = self.namespace.snapshot();
        Ok(NamespaceGuard {
            interpreter: self,
            saved: Some(saved),
        })
    }
}
