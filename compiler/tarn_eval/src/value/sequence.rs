//! Index and slice arithmetic shared by every ordered container.

use super::Value;
use crate::errors::{index_out_of_range, overflow_error, value_error, wrong_index_type, EvalError};

/// Resolve a possibly negative integer index against `len`.
pub fn resolve_index(index: &Value, len: usize, container: &str) -> Result<usize, EvalError> {
    let raw = match index {
        Value::Int(i) => i.to_i64(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => return Err(wrong_index_type(container, index.type_name())),
    };
    let len_i = len as i128;
    let pos = raw.map(|r| if r < 0 { i128::from(r) + len_i } else { i128::from(r) });
    match pos {
        Some(p) if (0..len_i).contains(&p) => Ok(p as usize),
        _ => Err(index_out_of_range(container)),
    }
}

/// Concrete positions selected by a slice over a sequence of known length.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SliceIndices {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl SliceIndices {
    /// Clamp `start:stop:step` to `len` the way sequence slicing does.
    /// Omitted bounds are `Value::None`.
    pub fn resolve(
        len: usize,
        start: &Value,
        stop: &Value,
        step: &Value,
    ) -> Result<SliceIndices, EvalError> {
        let step = match slice_bound(step)? {
            None => 1,
            Some(0) => return Err(value_error("slice step cannot be zero")),
            Some(s) => s,
        };
        let len = i64::try_from(len)
            .map_err(|_| overflow_error("sequence is too long to slice"))?;
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
        let clamp = |bound: Option<i64>, default: i64| match bound {
            None => default,
            Some(b) if b < 0 => (b.saturating_add(len)).max(lower),
            Some(b) => b.min(upper),
        };
        let start = clamp(slice_bound(start)?, if step < 0 { upper } else { lower });
        let stop = clamp(slice_bound(stop)?, if step < 0 { lower } else { upper });
        Ok(SliceIndices { start, stop, step })
    }

    pub fn len(&self) -> usize {
        let (start, stop, step) = (
            i128::from(self.start),
            i128::from(self.stop),
            i128::from(self.step),
        );
        let n = if step > 0 && start < stop {
            (stop - start - 1) / step + 1
        } else if step < 0 && stop < start {
            (start - stop - 1) / (-step) + 1
        } else {
            0
        };
        n as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> {
        let (start, step) = (i128::from(self.start), i128::from(self.step));
        (0..self.len() as i128).map(move |k| (start + k * step) as usize)
    }
}

/// Slice bounds saturate: huge integers clamp instead of failing.
fn slice_bound(value: &Value) -> Result<Option<i64>, EvalError> {
    match value {
        Value::None => Ok(None),
        Value::Bool(b) => Ok(Some(i64::from(*b))),
        Value::Int(i) => Ok(Some(i.to_i64().unwrap_or(if i.is_negative() {
            i64::MIN / 2
        } else {
            i64::MAX / 2
        }))),
        other => Err(crate::errors::type_error(format!(
            "slice indices must be integers or None, not {}",
            other.type_name()
        ))),
    }
}

/// Lazy iteration over any iterable value.
///
/// Ranges stay lazy so `for i in range(10**12)` does not allocate; every
/// other container is snapshotted up front, so mutating a list while
/// looping over it does not disturb the loop.
pub enum ValueIter {
    Items(std::vec::IntoIter<Value>),
    Range { next: i64, stop: i64, step: i64 },
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            ValueIter::Items(items) => items.next(),
            ValueIter::Range { next, stop, step } => {
                let more = if *step > 0 { *next < *stop } else { *next > *stop };
                if !more {
                    return None;
                }
                let current = *next;
                *next = next.saturating_add(*step);
                Some(Value::int(current))
            }
        }
    }
}
