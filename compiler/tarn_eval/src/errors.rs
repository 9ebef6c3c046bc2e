//! Evaluation errors and their constructors.
//!
//! Every failure the evaluator can produce is built by one of the `#[cold]`
//! factories below so the messages live in one place. An `EvalError` carries
//! its category (`ErrorKind`), the script-visible exception class, the
//! message, and the location of the innermost node that failed. Locations
//! are attached while the error propagates and never overwritten, so the
//! deepest node wins.
//!
//! # Usage
//!
//! ```ignore
//! use tarn_eval::errors::{name_not_defined, division_by_zero};
//! ```

use std::fmt;
use std::rc::Rc;

use tarn_ir::Location;

use crate::value::{ExcType, ExceptionValue, Value};

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Failure category, independent of the exception class name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Name,
    Attribute,
    Arity,
    Type,
    /// Time, step, depth, or magnitude limit. Never catchable by scripts.
    Resource,
    Unsupported,
    Assertion,
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Name => "name error",
            ErrorKind::Attribute => "attribute error",
            ErrorKind::Arity => "arity error",
            ErrorKind::Type => "type error",
            ErrorKind::Resource => "resource limit",
            ErrorKind::Unsupported => "unsupported construct",
            ErrorKind::Assertion => "assertion failed",
            ErrorKind::Runtime => "runtime error",
        };
        f.write_str(text)
    }
}

/// A procedure call the error passed through on its way out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub name: Rc<str>,
    /// Line of the procedure definition.
    pub line: u32,
}

#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub exc: ExcType,
    pub message: String,
    pub loc: Option<Location>,
    /// Exception object from a script `raise`, kept so a re-raise or a
    /// handler binding sees the original arguments.
    pub payload: Option<Rc<ExceptionValue>>,
    /// Innermost call first.
    pub frames: Vec<Frame>,
}

impl EvalError {
    pub fn new(kind: ErrorKind, exc: ExcType, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            exc,
            message: message.into(),
            loc: None,
            payload: None,
            frames: Vec::new(),
        }
    }

    /// Attach a location unless a deeper node already did.
    #[must_use]
    pub fn at(mut self, loc: Location) -> Self {
        if self.loc.is_none() && loc.is_known() {
            self.loc = Some(loc);
        }
        self
    }

    /// Build from a script exception object.
    pub fn from_exception(exception: Rc<ExceptionValue>) -> Self {
        EvalError {
            kind: exception.exc.kind(),
            exc: exception.exc,
            message: exception.message(),
            loc: None,
            payload: Some(exception),
            frames: Vec::new(),
        }
    }

    /// Script-visible exception object for handler bindings.
    pub fn to_exception(&self) -> Rc<ExceptionValue> {
        match &self.payload {
            Some(payload) => payload.clone(),
            None => Rc::new(ExceptionValue::with_message(self.exc, &self.message)),
        }
    }

    /// Resource failures bypass every handler.
    pub fn is_catchable(&self) -> bool {
        self.kind != ErrorKind::Resource
    }

    pub fn line(&self) -> Option<u32> {
        self.loc.map(|l| l.line)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.exc, self.message)
    }
}

impl std::error::Error for EvalError {}

// Name errors

#[cold]
pub fn name_not_defined(name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Name,
        ExcType::NameError,
        format!("name `{name}` is not defined"),
    )
}

#[cold]
pub fn invalid_symbol_name(name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Name,
        ExcType::NameError,
        format!("invalid symbol name (reserved word?) `{name}`"),
    )
}

// Attribute errors

#[cold]
pub fn attribute_denied(attr: &str, target: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Attribute,
        ExcType::AttributeError,
        format!("cannot access attribute `{attr}` for {target}"),
    )
}

#[cold]
pub fn no_attribute(attr: &str, target: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Attribute,
        ExcType::AttributeError,
        format!("no attribute `{attr}` for {target}"),
    )
}

#[cold]
pub fn cannot_assign_attribute(attr: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Attribute,
        ExcType::AttributeError,
        format!("cannot assign to attribute `{attr}`"),
    )
}

#[cold]
pub fn cannot_delete_attribute(attr: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Attribute,
        ExcType::AttributeError,
        format!("cannot delete attribute `{attr}`"),
    )
}

// Arity errors

#[cold]
pub fn unpack_too_many(expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Arity,
        ExcType::ValueError,
        format!("too many values to unpack (expected {expected}, got {got})"),
    )
}

#[cold]
pub fn unpack_not_enough(expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Arity,
        ExcType::ValueError,
        format!("not enough values to unpack (expected {expected}, got {got})"),
    )
}

#[cold]
pub fn not_enough_arguments(procedure: &str, expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Arity,
        ExcType::TypeError,
        format!("not enough arguments for Procedure `{procedure}()` (expected {expected}, got {got})"),
    )
}

#[cold]
pub fn too_many_arguments(procedure: &str, expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Arity,
        ExcType::TypeError,
        format!("too many arguments for Procedure `{procedure}()` (expected {expected}, got {got})"),
    )
}

#[cold]
pub fn duplicate_argument(name: &str, procedure: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Arity,
        ExcType::TypeError,
        format!("multiple values for keyword argument `{name}` in Procedure `{procedure}`"),
    )
}

#[cold]
pub fn extra_keywords(procedure: &str, names: &[Rc<str>]) -> EvalError {
    let listed = names
        .iter()
        .map(|n| format!("`{n}`"))
        .collect::<Vec<_>>()
        .join(", ");
    EvalError::new(
        ErrorKind::Arity,
        ExcType::TypeError,
        format!("extra keyword arguments for Procedure `{procedure}` ({listed})"),
    )
}

/// Arity failure for a native function.
#[cold]
pub fn wrong_arg_count(function: &str, expected: &str, got: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Arity,
        ExcType::TypeError,
        format!("{function}() takes {expected} ({got} given)"),
    )
}

#[cold]
pub fn unexpected_keyword(function: &str, keyword: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Arity,
        ExcType::TypeError,
        format!("{function}() got an unexpected keyword argument `{keyword}`"),
    )
}

// Type errors

#[cold]
pub fn type_error(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrorKind::Type, ExcType::TypeError, message)
}

#[cold]
pub fn unsupported_operand(op: &str, left: &str, right: &str) -> EvalError {
    type_error(format!(
        "unsupported operand type(s) for {op}: '{left}' and '{right}'"
    ))
}

#[cold]
pub fn bad_operand_unary(op: &str, operand: &str) -> EvalError {
    type_error(format!("bad operand type for unary {op}: '{operand}'"))
}

#[cold]
pub fn not_comparable(op: &str, left: &str, right: &str) -> EvalError {
    type_error(format!(
        "'{op}' not supported between instances of '{left}' and '{right}'"
    ))
}

#[cold]
pub fn not_callable(repr: &str) -> EvalError {
    type_error(format!("`{repr}` is not callable"))
}

#[cold]
pub fn not_iterable(type_name: &str) -> EvalError {
    type_error(format!("'{type_name}' object is not iterable"))
}

#[cold]
pub fn not_subscriptable(type_name: &str) -> EvalError {
    type_error(format!("'{type_name}' object is not subscriptable"))
}

#[cold]
pub fn unhashable_type(type_name: &str) -> EvalError {
    type_error(format!("unhashable type: '{type_name}'"))
}

#[cold]
pub fn wrong_index_type(container: &str, index: &str) -> EvalError {
    type_error(format!(
        "{container} indices must be integers or slices, not {index}"
    ))
}

#[cold]
pub fn foreign_procedure(name: &str) -> EvalError {
    type_error(format!(
        "Procedure `{name}` belongs to a different interpreter"
    ))
}

// Runtime errors

#[cold]
pub fn value_error(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrorKind::Runtime, ExcType::ValueError, message)
}

#[cold]
pub fn runtime_error(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrorKind::Runtime, ExcType::RuntimeError, message)
}

#[cold]
pub fn overflow_error(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrorKind::Runtime, ExcType::OverflowError, message)
}

#[cold]
pub fn division_by_zero(message: &str) -> EvalError {
    EvalError::new(ErrorKind::Runtime, ExcType::ZeroDivisionError, message)
}

#[cold]
pub fn index_out_of_range(container: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Runtime,
        ExcType::IndexError,
        format!("{container} index out of range"),
    )
}

#[cold]
pub fn index_error(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrorKind::Runtime, ExcType::IndexError, message)
}

#[cold]
pub fn key_error(key_repr: &str) -> EvalError {
    EvalError::new(ErrorKind::Runtime, ExcType::KeyError, key_repr)
}

#[cold]
pub fn math_domain_error() -> EvalError {
    value_error("math domain error")
}

#[cold]
pub fn math_range_error() -> EvalError {
    overflow_error("math range error")
}

#[cold]
pub fn no_active_exception() -> EvalError {
    runtime_error("No active exception to reraise")
}

#[cold]
pub fn stray_signal(keyword: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Syntax,
        ExcType::SyntaxError,
        format!("'{keyword}' outside loop or function"),
    )
}

#[cold]
pub fn syntax_error(message: impl Into<String>, loc: Option<Location>) -> EvalError {
    let mut err = EvalError::new(ErrorKind::Syntax, ExcType::SyntaxError, message);
    err.loc = loc;
    err
}

/// Wraps a failure from inside a native function with the function name.
#[cold]
pub fn call_failed(function: &str, mut inner: EvalError) -> EvalError {
    if inner.message.starts_with("Error calling `") {
        return inner;
    }
    inner.message = format!("Error calling `{function}()`: `{}`", inner.message);
    inner
}

// Assertion and unsupported constructs

#[cold]
pub fn assertion_failed(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrorKind::Assertion, ExcType::AssertionError, message)
}

#[cold]
pub fn unsupported(construct: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Unsupported,
        ExcType::NotImplementedError,
        format!("`{construct}` not supported"),
    )
}

// Resource limits

#[cold]
pub fn time_limit_exceeded(max_seconds: f64) -> EvalError {
    EvalError::new(
        ErrorKind::Resource,
        ExcType::RuntimeError,
        format!(
            "Execution exceeded time limit, max runtime is {}s",
            crate::value::repr::float_repr(max_seconds).trim_end_matches(".0")
        ),
    )
}

#[cold]
pub fn step_limit_exceeded(max_steps: u64) -> EvalError {
    EvalError::new(
        ErrorKind::Resource,
        ExcType::RuntimeError,
        format!("Max cycles exceeded, max is {max_steps}"),
    )
}

#[cold]
pub fn recursion_limit_exceeded(max_depth: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Resource,
        ExcType::RecursionError,
        format!("maximum recursion depth exceeded (max is {max_depth})"),
    )
}

#[cold]
pub fn exponent_too_large(max: u64) -> EvalError {
    EvalError::new(
        ErrorKind::Resource,
        ExcType::MemoryError,
        format!("Invalid exponent, max exponent is {max}"),
    )
}

#[cold]
pub fn int_too_large(max_bits: u64) -> EvalError {
    EvalError::new(
        ErrorKind::Resource,
        ExcType::MemoryError,
        format!("Integer result too large, max is {max_bits} bits"),
    )
}

#[cold]
pub fn shift_too_large(max: u64) -> EvalError {
    EvalError::new(
        ErrorKind::Resource,
        ExcType::MemoryError,
        format!("Invalid left shift, max left shift is {max}"),
    )
}

#[cold]
pub fn string_too_long(max: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Resource,
        ExcType::MemoryError,
        format!("String length exceeded, max string length is {max}"),
    )
}

#[cold]
pub fn factorial_too_large(max: u64) -> EvalError {
    EvalError::new(
        ErrorKind::Resource,
        ExcType::MemoryError,
        format!("factorial() argument too large, max is {max}"),
    )
}
