//! Tree-walking interpreter for Tarn.
//!
//! # Architecture
//!
//! `Interpreter` owns one flat [`Namespace`] plus the run state of the
//! current evaluation (governor counters, the error trail, the exception
//! being handled). Evaluation goes through two entry points in the helper
//! modules:
//!
//! - `expr`: `eval_expr`, one arm per expression kind
//! - `stmt`: `exec_stmt` / `exec_block`, one arm per statement kind, with
//!   control flow carried in the returned [`Flow`]
//! - `assign`: binding, unpacking, and deletion targets
//! - `access`: attribute lookup (the sandbox gate) and subscripts
//! - `call`: argument evaluation, procedure calls, native calls
//!
//! Every dispatch charges one step to the governor before doing any work,
//! so the step and time ceilings bound every script.
//!
//! # Instances
//!
//! Instances share nothing. Each gets a process-unique [`InstanceId`];
//! procedures remember the instance that defined them and refuse to run
//! anywhere else.

mod access;
mod assign;
mod builder;
mod call;
mod expr;
mod flow;
mod namespace_guard;
mod stmt;

pub use access::{get_attribute, get_item, UNSAFE_ATTRS};
pub use builder::InterpreterBuilder;
pub use flow::Flow;
pub use namespace_guard::NamespaceGuard;

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tarn_ir::{Ident, Module, StmtKind};

use crate::args::CallArgs;
use crate::diagnostics::{ErrorAccumulator, ErrorRecord, EvalFailure};
use crate::errors::{stray_signal, syntax_error, EvalError, EvalResult};
use crate::limits::{Governor, ResourceLimits};
use crate::namespace::Namespace;
use crate::print_handler::SharedPrintHandler;
use crate::tracer::Tracer;
use crate::value::{HostFunction, Value};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an interpreter instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn next() -> Self {
        InstanceId(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }
}

/// What `eval_with` does with a failure.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Return the composed failure to the caller.
    #[default]
    Raise,
    /// Write the composed failure to the error sink and return `None`.
    Report,
}

pub struct Interpreter {
    id: InstanceId,
    namespace: Namespace,
    governor: Governor,
    errors: ErrorAccumulator,
    /// The failure an `except` handler is running for; bare `raise`
    /// re-raises it.
    last_error: Option<EvalError>,
    tracer: Tracer,
    writer: SharedPrintHandler,
    err_writer: SharedPrintHandler,
    use_arrays: bool,
    source: Option<Rc<str>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    /// Interpreter with default limits, stdout/stderr sinks, and the
    /// standard seed namespace.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Parse and evaluate `source`, returning the value of the last
    /// top-level expression statement.
    pub fn eval(&mut self, source: &str) -> Result<Value, EvalFailure> {
        self.eval_with(source, ErrorMode::Raise)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(instance = self.id.0))]
    pub fn eval_with(&mut self, source: &str, mode: ErrorMode) -> Result<Value, EvalFailure> {
        self.begin();
        self.source = Some(Rc::from(source));
        let result = match tarn_parse::parse(source) {
            Ok(module) => self.execute_module(&module),
            Err(err) => Err(syntax_error(err.message, Some(err.location))),
        };
        self.finish(result, mode)
    }

    /// Evaluate a tree built by the host.
    pub fn run(&mut self, module: &Module) -> Result<Value, EvalFailure> {
        self.begin();
        self.source = None;
        let result = self.execute_module(module);
        self.finish(result, ErrorMode::Raise)
    }

    /// Call a script value (typically a procedure) from the host.
    pub fn call(&mut self, callee: &Value, args: CallArgs) -> Result<Value, EvalFailure> {
        self.begin();
        let result = self.call_value(callee, args);
        self.finish(result, ErrorMode::Raise)
    }

    fn begin(&mut self) {
        self.errors.clear();
        self.tracer.clear();
        self.governor.reset();
        self.last_error = None;
        tracing::debug!(instance = self.id.0, "evaluation started");
    }

    fn finish(&mut self, result: EvalResult, mode: ErrorMode) -> Result<Value, EvalFailure> {
        let err = match result {
            Ok(value) => {
                tracing::debug!(steps = self.governor.steps(), "evaluation finished");
                return Ok(value);
            }
            Err(err) => err,
        };
        tracing::debug!(kind = %err.kind, exc = %err.exc, message = %err.message, "evaluation failed");
        self.errors.record(&err, self.source.as_deref());
        let Some(failure) = EvalFailure::from_records(self.errors.records().to_vec()) else {
            return Ok(Value::None);
        };
        match mode {
            ErrorMode::Raise => Err(failure),
            ErrorMode::Report => {
                self.err_writer.println(&failure.to_string());
                Ok(Value::None)
            }
        }
    }

    /// Run top-level statements. The result is the value of the final
    /// statement when it is an expression statement, else `None`.
    fn execute_module(&mut self, module: &Module) -> EvalResult {
        let mut last = Value::None;
        for stmt in &module.body {
            match self.exec_stmt(stmt)? {
                Flow::Normal(value) => {
                    last = if matches!(stmt.kind, StmtKind::Expr(_)) {
                        value
                    } else {
                        Value::None
                    };
                }
                Flow::Break => return Err(stray_signal("break").at(stmt.loc)),
                Flow::Continue => return Err(stray_signal("continue").at(stmt.loc)),
                Flow::Return(_) => return Err(stray_signal("return").at(stmt.loc)),
            }
        }
        Ok(last)
    }

    // Host access to the namespace

    pub fn get_symbol(&self, name: &str) -> Option<Value> {
        self.namespace.get(name).cloned()
    }

    /// Bind a name, with the same validation scripts get.
    pub fn set_symbol(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        self.namespace.define(Ident::from(name), value)
    }

    pub fn remove_symbol(&mut self, name: &str) -> Option<Value> {
        self.namespace.remove(name).ok()
    }

    /// Bound names, sorted.
    pub fn names(&self) -> Vec<Ident> {
        self.namespace.names()
    }

    /// Register a host function under `name`.
    pub fn add_function(
        &mut self,
        name: &str,
        func: impl Fn(&CallArgs) -> EvalResult + 'static,
    ) -> Result<(), EvalError> {
        let host = HostFunction::new(name, func);
        self.set_symbol(name, Value::HostFn(Rc::new(host)))
    }

    /// Error trail of the last evaluation, primary record first.
    pub fn errors(&self) -> &[ErrorRecord] {
        self.errors.records()
    }

    /// Trace lines of the last evaluation.
    pub fn trace(&self) -> &[String] {
        self.tracer.lines()
    }

    pub fn set_trace(&mut self, enabled: bool) {
        self.tracer.set_enabled(enabled);
    }

    pub fn limits(&self) -> &ResourceLimits {
        self.governor.limits()
    }

    pub fn set_limits(&mut self, limits: ResourceLimits) {
        self.governor.set_limits(limits);
    }

    /// Steps charged by the last evaluation.
    pub fn steps_taken(&self) -> u64 {
        self.governor.steps()
    }

    pub fn writer(&self) -> &SharedPrintHandler {
        &self.writer
    }

    pub fn use_arrays(&self) -> bool {
        self.use_arrays
    }

    /// Charge bulk work done inside a native function.
    pub fn charge(&mut self, steps: u64) -> Result<(), EvalError> {
        self.governor.charge(steps)
    }
}

#[cfg(test)]
mod tests;
