//! Tarn Eval - sandboxed tree-walking evaluator for Tarn scripts.
//!
//! Tarn is a restricted Python-like expression and statement language meant
//! to be embedded in a host program. Scripts see one flat namespace seeded
//! with a fixed set of builtins, and can reach nothing the host did not put
//! there.
//!
//! # Architecture
//!
//! - `Interpreter`: owns the namespace and evaluates parsed `tarn_ir` trees
//! - `evaluate_binary` / `evaluate_unary` / `evaluate_compare`: direct
//!   enum-based operator dispatch over the closed `Value` set
//! - `methods`: built-in method tables for `str`, `list`, `dict`, ...
//! - `builtins::seed`: the initial namespace
//! - `limits`: step, time, depth, and magnitude ceilings
//!
//! # Sandbox
//!
//! Attribute access is the only way to reach through a value, and it goes
//! through [`get_attribute`], which refuses every name in [`UNSAFE_ATTRS`]
//! and exposes only the small set of data attributes and methods listed per
//! type. There is no import, no file access, and no `eval`.
//!
//! ```
//! use tarn_eval::{Interpreter, Value};
//!
//! let mut interp = Interpreter::new();
//! let result = interp.eval("x = 6\nx * 7").unwrap();
//! assert_eq!(result, Value::int(42));
//! ```

pub mod args;
pub mod builtins;
pub mod compare;
pub mod diagnostics;
pub mod errors;
pub mod format;
pub mod interpreter;
pub mod limits;
pub mod methods;
pub mod namespace;
pub mod operators;
pub mod print_handler;
pub mod procedure;
mod tracer;
pub mod unary_operators;
pub mod value;

pub use args::CallArgs;
pub use builtins::seed;
pub use compare::evaluate_compare;
pub use diagnostics::{ErrorRecord, EvalFailure};
pub use errors::{ErrorKind, EvalError, EvalResult};
pub use interpreter::{
    get_attribute, ErrorMode, Flow, InstanceId, Interpreter, InterpreterBuilder, NamespaceGuard,
    UNSAFE_ATTRS,
};
pub use limits::ResourceLimits;
pub use namespace::Namespace;
pub use operators::evaluate_binary;
pub use print_handler::{
    buffer_handler, silent_handler, stderr_handler, stdout_handler, BufferPrintHandler,
    PrintHandlerImpl, SharedPrintHandler,
};
pub use unary_operators::evaluate_unary;
pub use value::{ExcType, Value};

#[cfg(test)]
mod tests;
