//! Comparison operators.
//!
//! `==` never fails: values of unrelated types are simply unequal. Ordering
//! comparisons are defined for numbers (across `bool`/`int`/`float`), strings,
//! and lexicographically for lists and tuples of the same kind; anything else
//! is a type error. NaN is unordered, so every ordering against it is false.
//!
//! With arrays on either side, comparisons are elementwise and produce a
//! boolean array.

use std::cmp::Ordering;
use std::rc::Rc;

use tarn_ir::CmpOp;

use crate::errors::{not_comparable, type_error, EvalError, EvalResult};
use crate::value::{DType, Int, NdArray, Value};

/// Script-level `==`.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) | (Value::Ellipsis, Value::Ellipsis) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            Rc::ptr_eq(a, b) || seq_equal(&a.borrow(), &b.borrow())
        }
        (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b) || seq_equal(a, b),
        (Value::Dict(a), Value::Dict(b)) => {
            if Rc::ptr_eq(a, b) {
                return true;
            }
            let (a, b) = (a.borrow(), b.borrow());
            a.len() == b.len()
                && a.iter().all(|(k, v)| {
                    matches!(b.get(k), Ok(Some(other)) if values_equal(v, other))
                })
        }
        (Value::Range(a), Value::Range(b)) => {
            let (la, lb) = (a.len(), b.len());
            la == lb && (la == 0 || (a.start == b.start && (la == 1 || a.step == b.step)))
        }
        (Value::Slice(a), Value::Slice(b)) => {
            values_equal(&a.start, &b.start)
                && values_equal(&a.stop, &b.stop)
                && values_equal(&a.step, &b.step)
        }
        (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
        (Value::ExcType(a), Value::ExcType(b)) => a == b,
        (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
        (Value::HostFn(a), Value::HostFn(b)) => Rc::ptr_eq(a, b),
        (Value::BoundMethod(a), Value::BoundMethod(b)) => Rc::ptr_eq(a, b),
        (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
        (a, b) if a.is_number() && b.is_number() => {
            numeric_cmp(a, b) == Some(Ordering::Equal)
        }
        _ => false,
    }
}

fn seq_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
}

/// Exact ordering between two real numbers. `None` when NaN is involved.
pub fn numeric_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Float(a), other) => other.as_int()?.cmp_f64(*a).map(Ordering::reverse),
        (other, Value::Float(b)) => other.as_int()?.cmp_f64(*b),
        (a, b) => Some(a.as_int()?.cmp(&b.as_int()?)),
    }
}

/// Ordering used by `<`, `sorted`, `min` and `max`.
///
/// `Ok(None)` means the values are of comparable types but unordered (NaN).
pub fn compare_values(op: &str, left: &Value, right: &Value) -> Result<Option<Ordering>, EvalError> {
    match (left, right) {
        (a, b) if a.is_number() && b.is_number() => Ok(numeric_cmp(a, b)),
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::List(a), Value::List(b)) => {
            let (a, b) = (a.borrow().clone(), b.borrow().clone());
            seq_cmp(op, &a, &b)
        }
        (Value::Tuple(a), Value::Tuple(b)) => seq_cmp(op, a, b),
        _ => Err(not_comparable(op, left.type_name(), right.type_name())),
    }
}

fn seq_cmp(op: &str, a: &[Value], b: &[Value]) -> Result<Option<Ordering>, EvalError> {
    for (x, y) in a.iter().zip(b) {
        if !values_equal(x, y) {
            return compare_values(op, x, y);
        }
    }
    Ok(Some(a.len().cmp(&b.len())))
}

/// `is`: identity for shared objects, value identity for immutable scalars.
pub fn is_identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) | (Value::Ellipsis, Value::Ellipsis) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
        (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b) || a == b,
        (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
        (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
        (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Range(a), Value::Range(b)) => a == b,
        (Value::Slice(a), Value::Slice(b)) => Rc::ptr_eq(a, b),
        (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
        (Value::ExcType(a), Value::ExcType(b)) => a == b,
        (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
        (Value::HostFn(a), Value::HostFn(b)) => Rc::ptr_eq(a, b),
        (Value::BoundMethod(a), Value::BoundMethod(b)) => Rc::ptr_eq(a, b),
        (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// `in`: membership in a container.
pub fn contains(container: &Value, item: &Value) -> Result<bool, EvalError> {
    match container {
        Value::List(items) => Ok(items.borrow().iter().any(|x| values_equal(x, item))),
        Value::Tuple(items) => Ok(items.iter().any(|x| values_equal(x, item))),
        Value::Dict(d) => d.borrow().contains_key(item),
        Value::Str(s) => match item {
            Value::Str(needle) => Ok(s.contains(&**needle)),
            other => Err(type_error(format!(
                "'in <string>' requires string as left operand, not {}",
                other.type_name()
            ))),
        },
        Value::Range(r) => Ok(match item {
            Value::Float(f) => Int::from_f64(*f)
                .filter(|i| i.to_f64() == *f)
                .and_then(|i| i.to_i64())
                .is_some_and(|i| r.contains(i)),
            other => other.as_int().and_then(|i| i.to_i64()).is_some_and(|i| r.contains(i)),
        }),
        Value::Array(a) => {
            let a = a.borrow();
            Ok(item
                .as_f64()
                .is_some_and(|x| a.data().contains(&x)))
        }
        other => Err(type_error(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}

/// Evaluate one comparison `left op right`.
pub fn evaluate_compare(op: CmpOp, left: &Value, right: &Value) -> EvalResult {
    if let Some(result) = array_compare(op, left, right)? {
        return Ok(result);
    }
    let symbol = op.as_symbol();
    let ordered = |accept: fn(Ordering) -> bool| -> EvalResult {
        Ok(Value::Bool(
            compare_values(symbol, left, right)?.is_some_and(accept),
        ))
    };
    match op {
        CmpOp::Eq => Ok(Value::Bool(values_equal(left, right))),
        CmpOp::NotEq => Ok(Value::Bool(!values_equal(left, right))),
        CmpOp::Lt => ordered(Ordering::is_lt),
        CmpOp::LtE => ordered(Ordering::is_le),
        CmpOp::Gt => ordered(Ordering::is_gt),
        CmpOp::GtE => ordered(Ordering::is_ge),
        CmpOp::Is => Ok(Value::Bool(is_identical(left, right))),
        CmpOp::IsNot => Ok(Value::Bool(!is_identical(left, right))),
        CmpOp::In => Ok(Value::Bool(contains(right, left)?)),
        CmpOp::NotIn => Ok(Value::Bool(!contains(right, left)?)),
    }
}

/// Elementwise comparison when either side is an array.
fn array_compare(op: CmpOp, left: &Value, right: &Value) -> Result<Option<Value>, EvalError> {
    let f: fn(f64, f64) -> bool = match op {
        CmpOp::Eq => |a, b| a == b,
        CmpOp::NotEq => |a, b| a != b,
        CmpOp::Lt => |a, b| a < b,
        CmpOp::LtE => |a, b| a <= b,
        CmpOp::Gt => |a, b| a > b,
        CmpOp::GtE => |a, b| a >= b,
        CmpOp::Is | CmpOp::IsNot | CmpOp::In | CmpOp::NotIn => return Ok(None),
    };
    let (a, b) = match (left, right) {
        (Value::Array(a), Value::Array(b)) => (a.borrow().clone(), b.borrow().clone()),
        (Value::Array(a), other) if other.is_number() => {
            (a.borrow().clone(), NdArray::from_value(other)?)
        }
        (other, Value::Array(b)) if other.is_number() => {
            (NdArray::from_value(other)?, b.borrow().clone())
        }
        _ => return Ok(None),
    };
    let out = a.zip_with(&b, DType::Bool, |x, y| f64::from(u8::from(f(x, y))))?;
    Ok(Some(Value::array(out)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_across_kinds() {
        assert!(values_equal(&Value::int(1), &Value::Float(1.0)));
        assert!(values_equal(&Value::Bool(true), &Value::int(1)));
        assert!(!values_equal(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
        assert_eq!(
            numeric_cmp(&Value::int(2), &Value::Float(1.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            numeric_cmp(&Value::Float(1.5), &Value::int(2)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn unrelated_types_are_unequal_not_errors() {
        assert!(!values_equal(&Value::int(1), &Value::from("1")));
        assert!(matches!(
            evaluate_compare(CmpOp::Eq, &Value::None, &Value::int(0)),
            Ok(Value::Bool(false))
        ));
    }

    #[test]
    fn ordering_across_unrelated_types_fails() {
        let err = evaluate_compare(CmpOp::Lt, &Value::int(1), &Value::from("a"));
        assert!(matches!(err, Err(e)
            if e.message == "'<' not supported between instances of 'int' and 'str'"));
    }

    #[test]
    fn sequences_compare_lexicographically() {
        let a = Value::tuple(vec![Value::int(1), Value::int(2)]);
        let b = Value::tuple(vec![Value::int(1), Value::int(3)]);
        assert!(matches!(evaluate_compare(CmpOp::Lt, &a, &b), Ok(Value::Bool(true))));
        let short = Value::tuple(vec![Value::int(1)]);
        assert!(matches!(evaluate_compare(CmpOp::Lt, &short, &a), Ok(Value::Bool(true))));
    }

    #[test]
    fn membership() {
        let list = Value::list(vec![Value::int(1), Value::from("x")]);
        assert!(matches!(contains(&list, &Value::Float(1.0)), Ok(true)));
        assert!(matches!(contains(&Value::from("hello"), &Value::from("ell")), Ok(true)));
        assert!(contains(&Value::from("hello"), &Value::int(1)).is_err());
        assert!(contains(&Value::int(5), &Value::int(1)).is_err());
    }

    #[test]
    fn nan_is_unordered() {
        let nan = Value::Float(f64::NAN);
        assert!(matches!(evaluate_compare(CmpOp::Lt, &nan, &Value::int(1)), Ok(Value::Bool(false))));
        assert!(matches!(evaluate_compare(CmpOp::GtE, &nan, &Value::int(1)), Ok(Value::Bool(false))));
    }

    #[test]
    fn identity_of_shared_lists() {
        let a = Value::list(Vec::new());
        let b = a.clone();
        let c = Value::list(Vec::new());
        assert!(is_identical(&a, &b));
        assert!(!is_identical(&a, &c));
        assert!(values_equal(&a, &c));
    }
}
