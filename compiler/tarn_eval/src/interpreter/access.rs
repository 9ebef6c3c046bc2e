//! Attribute and subscript access.
//!
//! Attribute lookup is the sandbox gate. Names on [`UNSAFE_ATTRS`] are
//! refused for every receiver before anything else is consulted, so no value
//! can leak its class, globals, code objects, or frames. Everything else
//! resolves against a fixed per-type table of data attributes and methods.

use std::rc::Rc;

use tarn_ir::SliceKind;

use super::Interpreter;
use crate::errors::{
    attribute_denied, index_error, key_error, no_attribute, not_subscriptable, overflow_error,
    type_error, value_error, EvalError, EvalResult,
};
use crate::methods;
use crate::value::repr::repr;
use crate::value::{
    resolve_index, AxisIndex, BoundMethod, Builtin, NdArray, RangeValue, SliceIndices, SliceValue,
    Value,
};

/// Attributes no script may read, on any object.
pub const UNSAFE_ATTRS: &[&str] = &[
    "__subclasses__",
    "__bases__",
    "__globals__",
    "__code__",
    "__closure__",
    "__func__",
    "__self__",
    "__module__",
    "__dict__",
    "__class__",
    "__call__",
    "__get__",
    "__getattribute__",
    "__subclasshook__",
    "__new__",
    "__init__",
    "func_globals",
    "func_code",
    "func_closure",
    "im_class",
    "im_func",
    "im_self",
    "gi_code",
    "gi_frame",
    "f_locals",
    "__mro__",
    "__asteval__",
    "__tarn__",
];

/// Short quoted form of a value for attribute messages.
fn describe(value: &Value) -> String {
    const MAX: usize = 50;
    let text = repr(value);
    if text.chars().count() > MAX {
        let head: String = text.chars().take(MAX).collect();
        format!("`{head}...`")
    } else {
        format!("`{text}`")
    }
}

/// `value.attr`.
pub fn get_attribute(value: &Value, attr: &str) -> EvalResult {
    if UNSAFE_ATTRS.contains(&attr) {
        return Err(attribute_denied(attr, &describe(value)));
    }
    if let Some(found) = data_attribute(value, attr) {
        return Ok(found);
    }
    match methods::lookup(value, attr) {
        Some(name) => Ok(Value::BoundMethod(Rc::new(BoundMethod {
            receiver: value.clone(),
            name,
        }))),
        None => Err(no_attribute(attr, &describe(value))),
    }
}

fn data_attribute(value: &Value, attr: &str) -> Option<Value> {
    let found = match (value, attr) {
        (Value::Int(_) | Value::Bool(_), "real" | "numerator") => Value::Int(value.as_int()?),
        (Value::Int(_) | Value::Bool(_), "imag") => Value::int(0),
        (Value::Int(_) | Value::Bool(_), "denominator") => Value::int(1),
        (Value::Float(f), "real") => Value::Float(*f),
        (Value::Float(_), "imag") => Value::Float(0.0),
        (Value::Range(r), "start") => Value::int(r.start),
        (Value::Range(r), "stop") => Value::int(r.stop),
        (Value::Range(r), "step") => Value::int(r.step),
        (Value::Slice(s), "start") => s.start.clone(),
        (Value::Slice(s), "stop") => s.stop.clone(),
        (Value::Slice(s), "step") => s.step.clone(),
        (Value::Exception(e), "args") => Value::tuple(e.args.clone()),
        (Value::Procedure(p), "__name__") => Value::Str(p.name.clone()),
        (Value::Procedure(p), "__doc__") => p.doc.clone().map_or(Value::None, Value::Str),
        (Value::Builtin(Builtin { name, .. }), "__name__") => Value::from(*name),
        (Value::HostFn(h), "__name__") => Value::Str(h.name.clone()),
        (Value::BoundMethod(m), "__name__") => Value::from(m.name),
        (Value::ExcType(t), "__name__") => Value::from(t.name()),
        (Value::Builtin(_) | Value::HostFn(_) | Value::BoundMethod(_) | Value::ExcType(_), "__doc__") => {
            Value::None
        }
        (Value::Array(a), "shape") => {
            let a = a.borrow();
            Value::tuple(a.shape().iter().map(|&d| Value::from(d as i64)).collect())
        }
        (Value::Array(a), "ndim") => Value::from(a.borrow().ndim() as i64),
        (Value::Array(a), "size") => Value::from(a.borrow().size() as i64),
        (Value::Array(a), "T") => Value::array(a.borrow().transpose()),
        (Value::Array(a), "dtype") => Value::from(a.borrow().dtype().name()),
        _ => return None,
    };
    Some(found)
}

impl Interpreter {
    /// Evaluate the index part of a subscript into a single value:
    /// a scalar, a `slice`, or a tuple of per-axis entries.
    pub(super) fn eval_slice(&mut self, slice: &SliceKind) -> EvalResult {
        match slice {
            SliceKind::Index(expr) => self.eval_expr(expr),
            SliceKind::Slice { lower, upper, step } => {
                let mut part = |e: &Option<tarn_ir::Expr>| match e {
                    Some(expr) => self.eval_expr(expr),
                    None => Ok(Value::None),
                };
                let start = part(lower)?;
                let stop = part(upper)?;
                let step = part(step)?;
                Ok(Value::Slice(Rc::new(SliceValue { start, stop, step })))
            }
            SliceKind::ExtSlice(dims) => {
                let mut items = Vec::with_capacity(dims.len());
                for dim in dims {
                    items.push(self.eval_slice(dim)?);
                }
                Ok(Value::tuple(items))
            }
        }
    }
}

fn resolve_slice(slice: &SliceValue, len: usize) -> Result<SliceIndices, EvalError> {
    SliceIndices::resolve(len, &slice.start, &slice.stop, &slice.step)
}

/// `container[index]`.
pub fn get_item(container: &Value, index: &Value) -> EvalResult {
    match (container, index) {
        (Value::List(items), Value::Slice(s)) => {
            let items = items.borrow();
            let picked = resolve_slice(s, items.len())?;
            Ok(Value::list(picked.positions().map(|p| items[p].clone()).collect()))
        }
        (Value::List(items), _) => {
            let items = items.borrow();
            Ok(items[resolve_index(index, items.len(), "list")?].clone())
        }
        (Value::Tuple(items), Value::Slice(s)) => {
            let picked = resolve_slice(s, items.len())?;
            Ok(Value::tuple(picked.positions().map(|p| items[p].clone()).collect()))
        }
        (Value::Tuple(items), _) => Ok(items[resolve_index(index, items.len(), "tuple")?].clone()),
        (Value::Str(s), Value::Slice(slice)) => {
            let chars: Vec<char> = s.chars().collect();
            let picked = resolve_slice(slice, chars.len())?;
            Ok(Value::from(picked.positions().map(|p| chars[p]).collect::<String>()))
        }
        (Value::Str(s), _) => {
            let len = s.chars().count();
            let pos = resolve_index(index, len, "string")?;
            Ok(Value::from(s.chars().nth(pos).map(String::from).unwrap_or_default()))
        }
        (Value::Range(r), Value::Slice(slice)) => slice_range(r, &resolve_slice(slice, r.len())?),
        (Value::Range(r), _) => Ok(Value::int(r.get(resolve_index(index, r.len(), "range object")?))),
        (Value::Dict(d), _) => d
            .borrow()
            .get(index)?
            .cloned()
            .ok_or_else(|| key_error(&repr(index))),
        (Value::Array(a), _) => {
            let a = a.borrow();
            let axes = axis_indices(&a, index)?;
            a.select(&axes)
        }
        (other, _) => Err(not_subscriptable(other.type_name())),
    }
}

/// A slice of a range is another range, its stop normalised to one step
/// past the last element.
fn slice_range(r: &RangeValue, picked: &SliceIndices) -> EvalResult {
    let step = i128::from(r.step) * i128::from(picked.step);
    let Ok(new_step) = i64::try_from(step) else {
        // A step this wide leaves at most two elements.
        return Ok(Value::list(picked.positions().map(|p| Value::int(r.get(p))).collect()));
    };
    let count = picked.len();
    if count == 0 {
        let first = i128::from(r.start) + i128::from(picked.start) * i128::from(r.step);
        let first = first.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        return Ok(Value::Range(RangeValue { start: first, stop: first, step: new_step }));
    }
    let first = r.get(picked.positions().next().unwrap_or_default());
    let last = i128::from(first) + (count as i128 - 1) * step;
    let stop = (last + step).clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
    let sliced = RangeValue { start: first, stop, step: new_step };
    if sliced.len() != count {
        return Err(overflow_error("range slice does not fit in 64-bit bounds"));
    }
    Ok(Value::Range(sliced))
}

/// Convert a subscript value into per-axis selections.
fn axis_indices(array: &NdArray, index: &Value) -> Result<Vec<AxisIndex>, EvalError> {
    let parts: Vec<Value> = match index {
        Value::Tuple(items) => items.to_vec(),
        other => vec![other.clone()],
    };
    if parts.len() > array.ndim() {
        return Err(index_error(format!(
            "too many indices for array: array is {}-dimensional, but {} were indexed",
            array.ndim(),
            parts.len()
        )));
    }
    parts
        .iter()
        .zip(array.shape())
        .map(|(part, &dim)| match part {
            Value::Slice(s) => Ok(AxisIndex::Range(resolve_slice(s, dim)?)),
            Value::Int(_) | Value::Bool(_) => {
                resolve_index(part, dim, "array").map(AxisIndex::Single).map_err(|e| {
                    if e.exc == crate::value::ExcType::IndexError {
                        index_error(format!("index out of bounds for axis with size {dim}"))
                    } else {
                        e
                    }
                })
            }
            other => Err(type_error(format!(
                "only integers and slices are valid array indices, not {}",
                other.type_name()
            ))),
        })
        .collect()
}

/// `container[index] = value`.
pub fn set_item(container: &Value, index: &Value, value: Value) -> Result<(), EvalError> {
    match (container, index) {
        (Value::List(items), Value::Slice(s)) => {
            let replacement: Vec<Value> = value.iter()?.collect();
            let mut items = items.borrow_mut();
            let picked = resolve_slice(s, items.len())?;
            if picked.step == 1 {
                let start = picked.start as usize;
                let stop = (picked.stop as usize).max(start);
                items.splice(start..stop, replacement);
                return Ok(());
            }
            if replacement.len() != picked.len() {
                return Err(value_error(format!(
                    "attempt to assign sequence of size {} to extended slice of size {}",
                    replacement.len(),
                    picked.len()
                )));
            }
            for (pos, item) in picked.positions().zip(replacement) {
                items[pos] = item;
            }
            Ok(())
        }
        (Value::List(items), _) => {
            let mut items = items.borrow_mut();
            let pos = resolve_index(index, items.len(), "list assignment")?;
            items[pos] = value;
            Ok(())
        }
        (Value::Dict(d), _) => d.borrow_mut().insert(index.clone(), value),
        (Value::Array(a), _) => {
            let source = NdArray::from_value(&value)?;
            let mut a = a.borrow_mut();
            let axes = axis_indices(&a, index)?;
            a.assign(&axes, &source)
        }
        (Value::Tuple(_) | Value::Str(_) | Value::Range(_), _) => Err(type_error(format!(
            "'{}' object does not support item assignment",
            container.type_name()
        ))),
        (other, _) => Err(not_subscriptable(other.type_name())),
    }
}

/// `del container[index]`.
pub fn del_item(container: &Value, index: &Value) -> Result<(), EvalError> {
    match (container, index) {
        (Value::List(items), Value::Slice(s)) => {
            let mut items = items.borrow_mut();
            let picked = resolve_slice(s, items.len())?;
            let mut positions: Vec<usize> = picked.positions().collect();
            positions.sort_unstable_by(|a, b| b.cmp(a));
            for pos in positions {
                items.remove(pos);
            }
            Ok(())
        }
        (Value::List(items), _) => {
            let mut items = items.borrow_mut();
            let pos = resolve_index(index, items.len(), "list assignment")?;
            items.remove(pos);
            Ok(())
        }
        (Value::Dict(d), _) => match d.borrow_mut().remove(index)? {
            Some(_) => Ok(()),
            None => Err(key_error(&repr(index))),
        },
        (other, _) => Err(type_error(format!(
            "'{}' object doesn't support item deletion",
            other.type_name()
        ))),
    }
}
