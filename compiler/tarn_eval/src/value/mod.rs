//! Runtime values.
//!
//! `Value` is the closed set of things a script can hold. Scalars are inline;
//! mutable containers (`List`, `Dict`, `Array`) share through
//! `Rc<RefCell<_>>` so aliasing behaves like the host language (`b = a;
//! b.append(1)` is visible through `a`). Immutable aggregates use plain `Rc`.
//!
//! Equality (`PartialEq`) is the script-level `==`: numeric types compare
//! across kinds and containers compare structurally.

mod array;
mod dict;
mod exception;
mod int;
pub mod repr;
mod sequence;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub use array::{shape_repr, AxisIndex, DType, NdArray};
pub use dict::{Dict, HashKey};
pub use exception::{ExcType, ExceptionValue};
pub use int::Int;
pub use sequence::{resolve_index, SliceIndices, ValueIter};

use crate::args::CallArgs;
use crate::errors::{not_iterable, type_error, value_error, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::procedure::Procedure;

/// Shared mutable cell for containers with reference semantics.
pub type Shared<T> = Rc<RefCell<T>>;

/// Signature of a native function in the namespace.
pub type BuiltinFn = fn(&mut Interpreter, CallArgs) -> EvalResult;

#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(Int),
    Float(f64),
    Str(Rc<str>),
    List(Shared<Vec<Value>>),
    Tuple(Rc<[Value]>),
    Dict(Shared<Dict>),
    Range(RangeValue),
    Slice(Rc<SliceValue>),
    Ellipsis,
    Exception(Rc<ExceptionValue>),
    ExcType(ExcType),
    Builtin(Builtin),
    HostFn(Rc<HostFunction>),
    BoundMethod(Rc<BoundMethod>),
    Procedure(Rc<Procedure>),
    Array(Shared<NdArray>),
}

/// A native function seeded into the namespace.
///
/// Type constructors (`int`, `list`, ...) are builtins with `is_type` set;
/// `type(x)` returns them and `isinstance` accepts them.
#[derive(Copy, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
    pub is_type: bool,
}

/// A host-registered callable.
pub struct HostFunction {
    pub name: Rc<str>,
    func: Box<dyn Fn(&CallArgs) -> EvalResult>,
}

impl HostFunction {
    pub fn new(name: impl Into<Rc<str>>, func: impl Fn(&CallArgs) -> EvalResult + 'static) -> Self {
        HostFunction {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn call(&self, args: &CallArgs) -> EvalResult {
        (self.func)(args)
    }
}

/// A method looked up on a receiver, waiting to be called.
pub struct BoundMethod {
    pub receiver: Value,
    pub name: &'static str,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RangeValue {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeValue {
    pub fn len(&self) -> usize {
        let (start, stop, step) = (
            i128::from(self.start),
            i128::from(self.stop),
            i128::from(self.step),
        );
        let (lo, hi, step) = if step > 0 {
            (start, stop, step)
        } else {
            (stop, start, -step)
        };
        if lo >= hi {
            0
        } else {
            ((hi - lo - 1) / step + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `index`th element; `index` must be below `len()`, which keeps
    /// the result inside `start..stop`.
    pub fn get(&self, index: usize) -> i64 {
        (i128::from(self.start) + index as i128 * i128::from(self.step)) as i64
    }

    pub fn contains(&self, value: i64) -> bool {
        let in_bounds = if self.step > 0 {
            self.start <= value && value < self.stop
        } else {
            self.stop < value && value <= self.start
        };
        in_bounds && (i128::from(value) - i128::from(self.start)) % i128::from(self.step) == 0
    }
}

/// `slice(start, stop, step)` object; omitted parts are `None`.
#[derive(Clone)]
pub struct SliceValue {
    pub start: Value,
    pub stop: Value,
    pub step: Value,
}

impl Value {
    pub fn int(value: i64) -> Value {
        Value::Int(Int::from_i64(value))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(items.into())
    }

    pub fn dict(dict: Dict) -> Value {
        Value::Dict(Rc::new(RefCell::new(dict)))
    }

    pub fn array(array: NdArray) -> Value {
        Value::Array(Rc::new(RefCell::new(array)))
    }

    pub fn exception(exc: ExcType, args: Vec<Value>) -> Value {
        Value::Exception(Rc::new(ExceptionValue::new(exc, args)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Range(_) => "range",
            Value::Slice(_) => "slice",
            Value::Ellipsis => "ellipsis",
            Value::Exception(e) => e.exc.name(),
            Value::ExcType(_) | Value::Builtin(Builtin { is_type: true, .. }) => "type",
            Value::Builtin(_) | Value::HostFn(_) => "builtin_function_or_method",
            Value::BoundMethod(_) => "method",
            Value::Procedure(_) => "Procedure",
            Value::Array(_) => "ndarray",
        }
    }

    /// Truth value. Arrays with more than one element are ambiguous.
    pub fn is_truthy(&self) -> Result<bool, EvalError> {
        Ok(match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => !i.is_zero(),
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Dict(d) => !d.borrow().is_empty(),
            Value::Range(r) => !r.is_empty(),
            Value::Array(a) => {
                let a = a.borrow();
                match a.size() {
                    0 => false,
                    1 => a.any(),
                    _ => {
                        return Err(value_error(
                            "The truth value of an array with more than one element is ambiguous. Use a.any() or a.all()",
                        ))
                    }
                }
            }
            _ => true,
        })
    }

    /// Integer view of `int` and `bool` values.
    pub fn as_int(&self) -> Option<Int> {
        match self {
            Value::Int(i) => Some(i.clone()),
            Value::Bool(b) => Some(Int::from_i64(i64::from(*b))),
            _ => None,
        }
    }

    /// Float view of any real number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(i.to_f64()),
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Bool(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Builtin(_)
                | Value::HostFn(_)
                | Value::BoundMethod(_)
                | Value::Procedure(_)
                | Value::ExcType(_)
        )
    }

    /// Iterate the value. Ranges stay lazy; everything else is snapshotted.
    pub fn iter(&self) -> Result<ValueIter, EvalError> {
        let items = match self {
            Value::Range(r) => {
                return Ok(ValueIter::Range {
                    next: r.start,
                    stop: r.stop,
                    step: r.step,
                })
            }
            Value::List(items) => items.borrow().clone(),
            Value::Tuple(items) => items.to_vec(),
            Value::Str(s) => s.chars().map(|c| Value::from(c.to_string())).collect(),
            Value::Dict(d) => d.borrow().keys().cloned().collect(),
            Value::Array(a) => {
                let a = a.borrow();
                if a.ndim() == 0 {
                    return Err(type_error("iteration over a 0-d array"));
                }
                a.rows()
            }
            other => return Err(not_iterable(other.type_name())),
        };
        Ok(ValueIter::Items(items.into_iter()))
    }

    /// Length as `len()` reports it.
    pub fn len(&self) -> Result<usize, EvalError> {
        match self {
            Value::Str(s) => Ok(s.chars().count()),
            Value::List(items) => Ok(items.borrow().len()),
            Value::Tuple(items) => Ok(items.len()),
            Value::Dict(d) => Ok(d.borrow().len()),
            Value::Range(r) => Ok(r.len()),
            Value::Array(a) => a.borrow().len(),
            other => Err(type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            ))),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Int> for Value {
    fn from(i: Int) -> Self {
        Value::Int(i)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::compare::values_equal(self, other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr::repr(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr::to_str(self))
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

#[cfg(test)]
mod tests;
