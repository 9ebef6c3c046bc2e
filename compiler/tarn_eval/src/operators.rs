//! Binary operator implementations.
//!
//! Direct match dispatch on the operand pair. The value set is closed, so
//! pattern matching gives exhaustiveness checking and no vtable hops.
//!
//! Integer arithmetic is arbitrary precision. The operations that can
//! allocate without bound are guarded by `ResourceLimits`: integer `**`
//! checks the exponent, `<<` checks the shift, and `**`, `*` and `<<` also
//! bound the bit width of the result. Concatenation and repetition of
//! strings and sequences check the resulting length.

use std::rc::Rc;

use tarn_ir::BinaryOp;

use crate::errors::{
    division_by_zero, exponent_too_large, int_too_large, overflow_error, shift_too_large,
    string_too_long, unsupported_operand, value_error, EvalResult,
};
use crate::limits::ResourceLimits;
use crate::value::{DType, Int, NdArray, Value};

/// Evaluate `left op right`.
pub fn evaluate_binary(
    left: &Value,
    right: &Value,
    op: BinaryOp,
    limits: &ResourceLimits,
) -> EvalResult {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b))
            if matches!(op, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor) =>
        {
            Ok(Value::Bool(match op {
                BinaryOp::BitAnd => a & b,
                BinaryOp::BitOr => a | b,
                _ => a ^ b,
            }))
        }
        (Value::Int(_) | Value::Bool(_), Value::Int(_) | Value::Bool(_)) => {
            match (left.as_int(), right.as_int()) {
                (Some(a), Some(b)) => eval_int_binary(&a, &b, op, limits),
                _ => Err(mismatch(left, right, op)),
            }
        }
        (Value::Float(_), _) | (_, Value::Float(_)) if left.is_number() && right.is_number() => {
            match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => eval_float_binary(a, b, op),
                _ => Err(mismatch(left, right, op)),
            }
        }
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
            check_len(a.chars().count() + b.chars().count(), limits)?;
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::from(joined))
        }
        (Value::Str(s), count) | (count, Value::Str(s))
            if op == BinaryOp::Mul && matches!(count, Value::Int(_) | Value::Bool(_)) =>
        {
            let n = repeat_count(count);
            check_len(s.chars().count().saturating_mul(n), limits)?;
            Ok(Value::from(s.repeat(n)))
        }
        (Value::Str(fmt), args) if op == BinaryOp::Mod => {
            let text = crate::format::percent_format(fmt, args)?;
            check_len(text.chars().count(), limits)?;
            Ok(Value::from(text))
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Add => {
            check_len(a.borrow().len() + b.borrow().len(), limits)?;
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (Value::Tuple(a), Value::Tuple(b)) if op == BinaryOp::Add => {
            check_len(a.len() + b.len(), limits)?;
            Ok(Value::tuple(a.iter().chain(b.iter()).cloned().collect()))
        }
        (Value::List(items), count) | (count, Value::List(items))
            if op == BinaryOp::Mul && matches!(count, Value::Int(_) | Value::Bool(_)) =>
        {
            let items = items.borrow().clone();
            Ok(Value::list(repeat_items(&items, repeat_count(count), limits)?))
        }
        (Value::Tuple(items), count) | (count, Value::Tuple(items))
            if op == BinaryOp::Mul && matches!(count, Value::Int(_) | Value::Bool(_)) =>
        {
            Ok(Value::Tuple(Rc::from(repeat_items(items, repeat_count(count), limits)?)))
        }
        (Value::Array(_), _) | (_, Value::Array(_)) => eval_array_binary(left, right, op),
        _ => Err(mismatch(left, right, op)),
    }
}

#[cold]
fn mismatch(left: &Value, right: &Value, op: BinaryOp) -> crate::errors::EvalError {
    unsupported_operand(op.as_symbol(), left.type_name(), right.type_name())
}

pub(crate) fn check_len(len: usize, limits: &ResourceLimits) -> Result<(), crate::errors::EvalError> {
    if len > limits.max_str_len {
        tracing::warn!(len, max = limits.max_str_len, "string length limit exceeded");
        return Err(string_too_long(limits.max_str_len));
    }
    Ok(())
}

/// Repetition count; negative counts repeat zero times.
fn repeat_count(count: &Value) -> usize {
    match count.as_int() {
        Some(i) if i.is_negative() => 0,
        Some(i) => i.to_i64().map_or(usize::MAX, |v| v as usize),
        None => 0,
    }
}

fn repeat_items(
    items: &[Value],
    n: usize,
    limits: &ResourceLimits,
) -> Result<Vec<Value>, crate::errors::EvalError> {
    if items.is_empty() || n == 0 {
        return Ok(Vec::new());
    }
    check_len(items.len().saturating_mul(n), limits)?;
    Ok(std::iter::repeat(items).take(n).flatten().cloned().collect())
}

/// Binary operations on integers (booleans already widened).
fn eval_int_binary(a: &Int, b: &Int, op: BinaryOp, limits: &ResourceLimits) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Int(a.add(b))),
        BinaryOp::Sub => Ok(Value::Int(a.sub(b))),
        BinaryOp::Mul => {
            if !a.is_zero() && !b.is_zero() {
                check_int_bits(a.bit_length().saturating_add(b.bit_length()), limits)?;
            }
            Ok(Value::Int(a.mul(b)))
        }
        BinaryOp::Div => {
            if b.is_zero() {
                return Err(division_by_zero("division by zero"));
            }
            let q = int_true_div(a, b);
            if q.is_infinite() {
                return Err(overflow_error("integer division result too large for a float"));
            }
            Ok(Value::Float(q))
        }
        BinaryOp::FloorDiv => a
            .floor_div(b)
            .map(Value::Int)
            .ok_or_else(|| division_by_zero("integer division or modulo by zero")),
        BinaryOp::Mod => a
            .modulo(b)
            .map(Value::Int)
            .ok_or_else(|| division_by_zero("integer division or modulo by zero")),
        BinaryOp::Pow => int_pow(a, b, limits),
        BinaryOp::LShift => {
            let shift = shift_amount(b)?;
            if shift > limits.max_shift {
                tracing::warn!(shift, max = limits.max_shift, "shift limit exceeded");
                return Err(shift_too_large(limits.max_shift));
            }
            if !a.is_zero() {
                check_int_bits(a.bit_length().saturating_add(shift), limits)?;
            }
            Ok(Value::Int(a.shl(shift)))
        }
        BinaryOp::RShift => Ok(Value::Int(a.shr(shift_amount(b)?))),
        BinaryOp::BitAnd => Ok(Value::Int(a.bitand(b))),
        BinaryOp::BitOr => Ok(Value::Int(a.bitor(b))),
        BinaryOp::BitXor => Ok(Value::Int(a.bitxor(b))),
    }
}

fn int_true_div(a: &Int, b: &Int) -> f64 {
    const EXACT: i64 = 1 << 53;
    match (a.to_i64(), b.to_i64()) {
        (Some(x), Some(y)) if x.abs() <= EXACT && y.abs() <= EXACT => x as f64 / y as f64,
        _ => a.to_f64() / b.to_f64(),
    }
}

fn shift_amount(b: &Int) -> Result<u64, crate::errors::EvalError> {
    if b.is_negative() {
        return Err(value_error("negative shift count"));
    }
    Ok(b.to_i64().map_or(u64::MAX, |v| v as u64))
}

/// Integer power. A negative exponent produces a float.
pub fn int_pow(base: &Int, exponent: &Int, limits: &ResourceLimits) -> EvalResult {
    if exponent.is_negative() {
        if base.is_zero() {
            return Err(division_by_zero("0.0 cannot be raised to a negative power"));
        }
        return Ok(Value::Float(base.to_f64().powf(exponent.to_f64())));
    }
    let exp = exponent.to_i64().map_or(u64::MAX, |v| v as u64);
    if exp > limits.max_exponent {
        tracing::warn!(exp, max = limits.max_exponent, "exponent limit exceeded");
        return Err(exponent_too_large(limits.max_exponent));
    }
    check_int_bits(base.bit_length().saturating_mul(exp), limits)?;
    Ok(Value::Int(base.pow(exp as u32)))
}

/// Reject an integer result wider than `max_int_bits` before building it.
fn check_int_bits(bits: u64, limits: &ResourceLimits) -> Result<(), crate::errors::EvalError> {
    let max = limits.max_int_bits();
    if bits > max {
        tracing::warn!(bits, max, "integer size limit exceeded");
        return Err(int_too_large(max));
    }
    Ok(())
}

/// Floor division and modulo of floats, matching `divmod`.
pub fn float_divmod(x: f64, y: f64) -> (f64, f64) {
    let mut m = x % y;
    let mut div = (x - m) / y;
    if m == 0.0 {
        m = 0.0f64.copysign(y);
    } else if (y < 0.0) != (m < 0.0) {
        m += y;
        div -= 1.0;
    }
    let floordiv = if div == 0.0 {
        0.0f64.copysign(x / y)
    } else {
        let f = div.floor();
        if div - f > 0.5 {
            f + 1.0
        } else {
            f
        }
    };
    (floordiv, m)
}

fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(division_by_zero("float division by zero"));
            }
            Ok(Value::Float(a / b))
        }
        BinaryOp::FloorDiv => {
            if b == 0.0 {
                return Err(division_by_zero("float floor division by zero"));
            }
            Ok(Value::Float(float_divmod(a, b).0))
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(division_by_zero("float modulo by zero"));
            }
            Ok(Value::Float(float_divmod(a, b).1))
        }
        BinaryOp::Pow => float_pow(a, b),
        BinaryOp::LShift
        | BinaryOp::RShift
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor => Err(unsupported_operand(op.as_symbol(), "float", "float")),
    }
}

pub fn float_pow(a: f64, b: f64) -> EvalResult {
    if a == 0.0 && b < 0.0 {
        return Err(division_by_zero("0.0 cannot be raised to a negative power"));
    }
    if a < 0.0 && b.fract() != 0.0 && b.is_finite() {
        return Err(value_error(
            "negative number cannot be raised to a fractional power",
        ));
    }
    let r = a.powf(b);
    if r.is_infinite() && a.is_finite() && b.is_finite() {
        return Err(overflow_error("Numerical result out of range"));
    }
    Ok(Value::Float(r))
}

/// Elementwise arithmetic with numpy-style broadcasting.
fn eval_array_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let as_array = |v: &Value| match v {
        Value::Array(a) => Some(a.borrow().clone()),
        other if other.is_number() => NdArray::from_value(other).ok(),
        Value::List(_) | Value::Tuple(_) => NdArray::from_value(v).ok(),
        _ => None,
    };
    let (Some(a), Some(b)) = (as_array(left), as_array(right)) else {
        return Err(mismatch(left, right, op));
    };
    let f: fn(f64, f64) -> f64 = match op {
        BinaryOp::Add => |x, y| x + y,
        BinaryOp::Sub => |x, y| x - y,
        BinaryOp::Mul => |x, y| x * y,
        BinaryOp::Div => |x, y| x / y,
        BinaryOp::FloorDiv => |x, y| (x / y).floor(),
        BinaryOp::Mod => |x, y| if y == 0.0 { f64::NAN } else { float_divmod(x, y).1 },
        BinaryOp::Pow => f64::powf,
        BinaryOp::LShift
        | BinaryOp::RShift
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor => {
            let both_bool = a.dtype() == DType::Bool && b.dtype() == DType::Bool;
            if !both_bool || matches!(op, BinaryOp::LShift | BinaryOp::RShift) {
                return Err(mismatch(left, right, op));
            }
            let g: fn(f64, f64) -> f64 = match op {
                BinaryOp::BitAnd => |x, y| f64::from(u8::from(x != 0.0 && y != 0.0)),
                BinaryOp::BitOr => |x, y| f64::from(u8::from(x != 0.0 || y != 0.0)),
                _ => |x, y| f64::from(u8::from((x != 0.0) != (y != 0.0))),
            };
            return Ok(Value::array(a.zip_with(&b, DType::Bool, g)?));
        }
    };
    Ok(Value::array(a.zip_with(&b, DType::Float, f)?))
}
