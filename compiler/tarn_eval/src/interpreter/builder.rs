//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use std::time::Duration;

use super::{InstanceId, Interpreter};
use crate::diagnostics::ErrorAccumulator;
use crate::limits::{Governor, ResourceLimits};
use crate::namespace::Namespace;
use crate::print_handler::{stderr_handler, stdout_handler, SharedPrintHandler};
use crate::tracer::Tracer;

/// Builder for creating Interpreter instances.
///
/// Defaults: `ResourceLimits::default()`, stdout for script output,
/// stderr for reports, tracing off, array functions not seeded.
#[derive(Default)]
pub struct InterpreterBuilder {
    limits: ResourceLimits,
    debug: bool,
    use_arrays: bool,
    trace: bool,
    writer: Option<SharedPrintHandler>,
    err_writer: Option<SharedPrintHandler>,
    symtable: Option<Namespace>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder::default()
    }

    #[must_use]
    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn max_time(mut self, max_time: Duration) -> Self {
        self.limits.max_time = max_time;
        self
    }

    #[must_use]
    pub fn max_steps(mut self, max_steps: u64) -> Self {
        self.limits.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.limits.max_call_depth = depth;
        self
    }

    /// Debug mode turns off the wall-clock deadline. The step ceiling
    /// still applies.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Seed the array functions (`array`, `zeros`, `dot`, ...).
    #[must_use]
    pub fn use_arrays(mut self, use_arrays: bool) -> Self {
        self.use_arrays = use_arrays;
        self
    }

    #[must_use]
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Sink for `print`.
    #[must_use]
    pub fn writer(mut self, writer: SharedPrintHandler) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Sink for failures in report mode.
    #[must_use]
    pub fn err_writer(mut self, err_writer: SharedPrintHandler) -> Self {
        self.err_writer = Some(err_writer);
        self
    }

    /// Start from this namespace instead of the standard seed.
    #[must_use]
    pub fn symtable(mut self, namespace: Namespace) -> Self {
        self.symtable = Some(namespace);
        self
    }

    pub fn build(self) -> Interpreter {
        let namespace = self
            .symtable
            .unwrap_or_else(|| crate::builtins::seed(self.use_arrays));
        let id = InstanceId::next();
        tracing::debug!(instance = id.0, names = namespace.len(), "interpreter created");
        Interpreter {
            id,
            namespace,
            governor: Governor::new(self.limits, self.debug),
            errors: ErrorAccumulator::new(),
            last_error: None,
            tracer: Tracer::new(self.trace),
            writer: self.writer.unwrap_or_else(stdout_handler),
            err_writer: self.err_writer.unwrap_or_else(stderr_handler),
            use_arrays: self.use_arrays,
            source: None,
        }
    }
}
