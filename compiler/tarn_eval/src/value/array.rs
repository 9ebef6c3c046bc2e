//! Row-major N-dimensional numeric arrays.
//!
//! Backing store is a flat `Vec<f64>`; the `DType` flag only changes how
//! elements surface as script values (`Bool` arrays yield `True`/`False`).
//! Elementwise operations broadcast: trailing dimensions are aligned and a
//! dimension of size one stretches to match the other operand.

use super::sequence::SliceIndices;
use super::Value;
use crate::errors::{type_error, value_error, EvalError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DType {
    Float,
    Bool,
}

impl DType {
    pub fn name(self) -> &'static str {
        match self {
            DType::Float => "float64",
            DType::Bool => "bool",
        }
    }
}

/// One position in a multi-axis index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisIndex {
    Single(usize),
    Range(SliceIndices),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: Vec<f64>,
    dtype: DType,
}

impl NdArray {
    /// `data.len()` must equal the product of `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<f64>, dtype: DType) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        NdArray { shape, data, dtype }
    }

    pub fn from_vec(data: Vec<f64>) -> Self {
        NdArray::new(vec![data.len()], data, DType::Float)
    }

    pub fn filled(shape: Vec<usize>, fill: f64) -> Self {
        let size = shape.iter().product();
        NdArray::new(shape, vec![fill; size], DType::Float)
    }

    /// Build from a number or a rectangular nest of lists and tuples.
    pub fn from_value(value: &Value) -> Result<NdArray, EvalError> {
        if let Value::Array(a) = value {
            return Ok(a.borrow().clone());
        }
        let mut shape = Vec::new();
        let mut head = value.clone();
        loop {
            let items = sequence_items(&head);
            match items {
                Some(items) => {
                    shape.push(items.len());
                    match items.into_iter().next() {
                        Some(first) => head = first,
                        None => break,
                    }
                }
                None => break,
            }
        }
        let mut data = Vec::with_capacity(shape.iter().product());
        let mut all_bool = true;
        flatten_into(value, &shape, &mut data, &mut all_bool)?;
        let dtype = if all_bool && !data.is_empty() {
            DType::Bool
        } else {
            DType::Float
        };
        Ok(NdArray::new(shape, data, dtype))
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Length of the first axis, as `len()` reports it.
    pub fn len(&self) -> Result<usize, EvalError> {
        self.shape
            .first()
            .copied()
            .ok_or_else(|| type_error("len() of unsized object"))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    fn element(&self, x: f64) -> Value {
        match self.dtype {
            DType::Bool => Value::Bool(x != 0.0),
            DType::Float => Value::Float(x),
        }
    }

    fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.shape.len()];
        for i in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.shape[i + 1];
        }
        strides
    }

    /// Select with one entry per leading axis; missing trailing axes are
    /// taken whole. A fully scalar selection yields an element value.
    pub fn select(&self, index: &[AxisIndex]) -> Result<Value, EvalError> {
        if index.len() > self.ndim() {
            return Err(value_error(format!(
                "too many indices for array: array is {}-dimensional, but {} were indexed",
                self.ndim(),
                index.len()
            )));
        }
        let (shape, offsets) = self.selection(index);
        if shape.is_empty() && offsets.len() == 1 {
            return Ok(self.element(self.data[offsets[0]]));
        }
        let data = offsets.iter().map(|&o| self.data[o]).collect();
        Ok(Value::array(NdArray::new(shape, data, self.dtype)))
    }

    /// Store `source` (one element or exactly one per selected slot).
    pub fn assign(&mut self, index: &[AxisIndex], source: &NdArray) -> Result<(), EvalError> {
        if index.len() > self.ndim() {
            return Err(value_error("too many indices for array"));
        }
        let (shape, offsets) = self.selection(index);
        let coerce = |x: f64| match self.dtype {
            DType::Bool => f64::from(u8::from(x != 0.0)),
            DType::Float => x,
        };
        if source.size() == offsets.len() {
            let values: Vec<f64> = source.data.iter().map(|&x| coerce(x)).collect();
            for (o, x) in offsets.into_iter().zip(values) {
                self.data[o] = x;
            }
        } else if source.size() == 1 {
            let x = coerce(source.data[0]);
            for o in offsets {
                self.data[o] = x;
            }
        } else {
            return Err(value_error(format!(
                "could not broadcast input array from shape {} into shape {}",
                shape_repr(&source.shape),
                shape_repr(&shape)
            )));
        }
        Ok(())
    }

    fn selection(&self, index: &[AxisIndex]) -> (Vec<usize>, Vec<usize>) {
        let strides = self.strides();
        let mut shape = Vec::new();
        let mut offsets = vec![0usize];
        for (axis, &dim) in self.shape.iter().enumerate() {
            let choice = index
                .get(axis)
                .copied()
                .unwrap_or(AxisIndex::Range(SliceIndices { start: 0, stop: dim as i64, step: 1 }));
            let positions: Vec<usize> = match choice {
                AxisIndex::Single(i) => vec![i],
                AxisIndex::Range(s) => {
                    shape.push(s.len());
                    s.positions().collect()
                }
            };
            let stride = strides[axis];
            offsets = offsets
                .iter()
                .flat_map(|base| positions.iter().map(move |p| base + p * stride))
                .collect();
        }
        (shape, offsets)
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> NdArray {
        NdArray::new(
            self.shape.clone(),
            self.data.iter().map(|&x| f(x)).collect(),
            DType::Float,
        )
    }

    /// Broadcast `self` against `other` and combine elementwise.
    pub fn zip_with(
        &self,
        other: &NdArray,
        dtype: DType,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<NdArray, EvalError> {
        if self.shape == other.shape {
            let data = self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect();
            return Ok(NdArray::new(self.shape.clone(), data, dtype));
        }
        let shape = broadcast_shape(&self.shape, &other.shape).ok_or_else(|| {
            value_error(format!(
                "operands could not be broadcast together with shapes {} {}",
                shape_repr(&self.shape),
                shape_repr(&other.shape)
            ))
        })?;
        let left = self.broadcast_offsets(&shape);
        let right = other.broadcast_offsets(&shape);
        let data = left
            .iter()
            .zip(&right)
            .map(|(&i, &j)| f(self.data[i], other.data[j]))
            .collect();
        Ok(NdArray::new(shape, data, dtype))
    }

    fn broadcast_offsets(&self, target: &[usize]) -> Vec<usize> {
        let strides = self.strides();
        let pad = target.len() - self.ndim();
        let mut offsets = vec![0usize];
        for (axis, &dim) in target.iter().enumerate() {
            let (own_dim, stride) = if axis < pad {
                (1, 0)
            } else {
                (self.shape[axis - pad], strides[axis - pad])
            };
            let step = if own_dim == 1 { 0 } else { stride };
            offsets = offsets
                .iter()
                .flat_map(|base| (0..dim).map(move |k| base + k * step))
                .collect();
        }
        offsets
    }

    /// New shape with at most one `-1` entry inferred.
    pub fn reshape(&self, dims: &[i64]) -> Result<NdArray, EvalError> {
        let known: i64 = dims.iter().filter(|d| **d != -1).product();
        let unknown = dims.iter().filter(|d| **d == -1).count();
        let size = self.size() as i64;
        let bad = || {
            value_error(format!(
                "cannot reshape array of size {} into shape {}",
                size,
                shape_repr_signed(dims)
            ))
        };
        if unknown > 1 || dims.iter().any(|d| *d < -1) {
            return Err(bad());
        }
        let shape: Vec<usize> = if unknown == 1 {
            if known == 0 || size % known != 0 {
                return Err(bad());
            }
            dims.iter()
                .map(|&d| if d == -1 { (size / known) as usize } else { d as usize })
                .collect()
        } else {
            if known != size {
                return Err(bad());
            }
            dims.iter().map(|&d| d as usize).collect()
        };
        Ok(NdArray::new(shape, self.data.clone(), self.dtype))
    }

    /// Reverse the axes.
    pub fn transpose(&self) -> NdArray {
        if self.ndim() < 2 {
            return self.clone();
        }
        let strides = self.strides();
        let shape: Vec<usize> = self.shape.iter().rev().copied().collect();
        let rev_strides: Vec<usize> = strides.iter().rev().copied().collect();
        let mut offsets = vec![0usize];
        for (axis, &dim) in shape.iter().enumerate() {
            let stride = rev_strides[axis];
            offsets = offsets
                .iter()
                .flat_map(|base| (0..dim).map(move |k| base + k * stride))
                .collect();
        }
        let data = offsets.iter().map(|&o| self.data[o]).collect();
        NdArray::new(shape, data, self.dtype)
    }

    /// Nested lists of element values.
    pub fn to_list(&self) -> Value {
        if self.shape.is_empty() {
            return self.data.first().map_or(Value::None, |&x| self.element(x));
        }
        self.nest(0, 0)
    }

    fn nest(&self, axis: usize, base: usize) -> Value {
        let strides = self.strides();
        let dim = self.shape[axis];
        let items = (0..dim)
            .map(|k| {
                let offset = base + k * strides[axis];
                if axis + 1 == self.ndim() {
                    self.element(self.data[offset])
                } else {
                    self.nest(axis + 1, offset)
                }
            })
            .collect();
        Value::list(items)
    }

    /// Rows along the first axis, for iteration.
    pub fn rows(&self) -> Vec<Value> {
        match self.shape.first() {
            None => Vec::new(),
            Some(&n) => (0..n)
                .filter_map(|i| self.select(&[AxisIndex::Single(i)]).ok())
                .collect(),
        }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            f64::NAN
        } else {
            self.sum() / self.data.len() as f64
        }
    }

    pub fn min(&self) -> Result<f64, EvalError> {
        self.reduce("minimum", f64::min)
    }

    pub fn max(&self) -> Result<f64, EvalError> {
        self.reduce("maximum", f64::max)
    }

    fn reduce(&self, what: &str, f: fn(f64, f64) -> f64) -> Result<f64, EvalError> {
        let mut iter = self.data.iter().copied();
        let first = iter.next().ok_or_else(|| {
            value_error(format!(
                "zero-size array to reduction operation {what} which has no identity"
            ))
        })?;
        Ok(iter.fold(first, |acc, x| if acc.is_nan() || x.is_nan() { f64::NAN } else { f(acc, x) }))
    }

    pub fn any(&self) -> bool {
        self.data.iter().any(|x| *x != 0.0)
    }

    pub fn all(&self) -> bool {
        self.data.iter().all(|x| *x != 0.0)
    }

    /// Inner product for vectors, matrix product otherwise.
    pub fn dot(&self, other: &NdArray) -> Result<Value, EvalError> {
        let mismatch = || {
            value_error(format!(
                "shapes {} and {} not aligned",
                shape_repr(&self.shape),
                shape_repr(&other.shape)
            ))
        };
        match (self.shape.as_slice(), other.shape.as_slice()) {
            ([n], [m]) => {
                if n != m {
                    return Err(mismatch());
                }
                Ok(Value::Float(self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum()))
            }
            ([rows, inner], [inner2, cols]) => {
                if inner != inner2 {
                    return Err(mismatch());
                }
                let mut out = vec![0.0; rows * cols];
                for r in 0..*rows {
                    for c in 0..*cols {
                        out[r * cols + c] = (0..*inner)
                            .map(|k| self.data[r * inner + k] * other.data[k * cols + c])
                            .sum();
                    }
                }
                Ok(Value::array(NdArray::new(vec![*rows, *cols], out, DType::Float)))
            }
            ([rows, inner], [inner2]) => {
                if inner != inner2 {
                    return Err(mismatch());
                }
                let out = (0..*rows)
                    .map(|r| (0..*inner).map(|k| self.data[r * inner + k] * other.data[k]).sum())
                    .collect();
                Ok(Value::array(NdArray::from_vec(out)))
            }
            _ => Err(mismatch()),
        }
    }
}

fn sequence_items(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::List(items) => Some(items.borrow().clone()),
        Value::Tuple(items) => Some(items.to_vec()),
        Value::Array(a) => Some(a.borrow().rows()),
        _ => None,
    }
}

fn flatten_into(
    value: &Value,
    shape: &[usize],
    out: &mut Vec<f64>,
    all_bool: &mut bool,
) -> Result<(), EvalError> {
    let inhomogeneous = || {
        value_error(
            "setting an array element with a sequence. The requested array has an inhomogeneous shape",
        )
    };
    match shape.split_first() {
        None => {
            let x = match value {
                Value::Bool(b) => f64::from(u8::from(*b)),
                Value::Int(i) => {
                    *all_bool = false;
                    i.to_f64()
                }
                Value::Float(f) => {
                    *all_bool = false;
                    *f
                }
                Value::List(_) | Value::Tuple(_) | Value::Array(_) => return Err(inhomogeneous()),
                other => {
                    return Err(type_error(format!(
                        "could not convert {} to an array element",
                        other.type_name()
                    )))
                }
            };
            out.push(x);
            Ok(())
        }
        Some((&dim, rest)) => {
            let items = sequence_items(value).ok_or_else(inhomogeneous)?;
            if items.len() != dim {
                return Err(inhomogeneous());
            }
            for item in &items {
                flatten_into(item, rest, out, all_bool)?;
            }
            Ok(())
        }
    }
}

fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let n = a.len().max(b.len());
    let mut shape = vec![0; n];
    for i in 0..n {
        let da = if i + a.len() >= n { a[i + a.len() - n] } else { 1 };
        let db = if i + b.len() >= n { b[i + b.len() - n] } else { 1 };
        shape[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(shape)
}

pub fn shape_repr(shape: &[usize]) -> String {
    match shape {
        [one] => format!("({one},)"),
        _ => format!(
            "({})",
            shape.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn shape_repr_signed(shape: &[i64]) -> String {
    match shape {
        [one] => format!("({one},)"),
        _ => format!(
            "({})",
            shape.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        ),
    }
}
