//! Array constructors, bound when arrays are enabled.
//!
//! Every constructor charges its element count to the governor before
//! allocating.

use super::bind;
use crate::args::{arg_f64, arg_i64, CallArgs};
use crate::errors::{type_error, value_error, wrong_arg_count, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::methods::shape_arg;
use crate::namespace::Namespace;
use crate::value::{NdArray, Value};

pub(super) fn register(namespace: &mut Namespace) {
    bind(namespace, "arange", arange);
    bind(namespace, "array", array);
    bind(namespace, "asarray", asarray);
    bind(namespace, "dot", dot);
    bind(namespace, "linspace", linspace);
    bind(namespace, "ones", ones);
    bind(namespace, "reshape", reshape);
    bind(namespace, "zeros", zeros);
}

fn array(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("array", &[])?;
    args.expect_count("array", 1, 1)?;
    let built = NdArray::from_value(&args.positional[0])?;
    interp.charge(built.size() as u64)?;
    Ok(Value::array(built))
}

/// Like `array`, but an array argument comes back as the same object.
fn asarray(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    if let Some(existing @ Value::Array(_)) = args.get(0) {
        args.expect_count("asarray", 1, 1)?;
        return Ok(existing.clone());
    }
    array(interp, args)
}

fn dims(name: &str, args: &CallArgs) -> Result<Vec<usize>, EvalError> {
    args.allow_keywords(name, &[])?;
    if args.is_empty() {
        return Err(type_error(format!("{name}() missing required argument 'shape'")));
    }
    shape_arg(name, &args.positional)?
        .into_iter()
        .map(|d| usize::try_from(d).map_err(|_| value_error("negative dimensions are not allowed")))
        .collect()
}

fn filled(interp: &mut Interpreter, name: &str, args: &CallArgs, fill: f64) -> EvalResult {
    let shape = dims(name, args)?;
    let size = shape
        .iter()
        .try_fold(1_u64, |acc, &d| acc.checked_mul(d as u64))
        .ok_or_else(|| value_error("array is too big"))?;
    interp.charge(size)?;
    Ok(Value::array(NdArray::filled(shape, fill)))
}

fn zeros(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    filled(interp, "zeros", &args, 0.0)
}

fn ones(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    filled(interp, "ones", &args, 1.0)
}

/// `arange(stop)`, `arange(start, stop)`, or `arange(start, stop, step)`.
fn arange(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("arange", &[])?;
    let nums = args
        .positional
        .iter()
        .map(|v| arg_f64("arange", v))
        .collect::<Result<Vec<_>, _>>()?;
    let (start, stop, step) = match *nums.as_slice() {
        [stop] => (0.0, stop, 1.0),
        [start, stop] => (start, stop, 1.0),
        [start, stop, step] => (start, stop, step),
        _ => return Err(wrong_arg_count("arange", "1 to 3", nums.len())),
    };
    if step == 0.0 {
        return Err(value_error("arange() step must not be zero"));
    }
    let count = ((stop - start) / step).ceil().max(0.0);
    if !count.is_finite() {
        return Err(value_error("arange() bounds must be finite"));
    }
    let count = count as u64;
    interp.charge(count)?;
    let data = (0..count).map(|i| start + i as f64 * step).collect();
    Ok(Value::array(NdArray::from_vec(data)))
}

/// `linspace(start, stop, num=50)`, endpoint included.
fn linspace(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("linspace", &["num"])?;
    args.expect_count("linspace", 2, 3)?;
    let start = arg_f64("linspace", &args.positional[0])?;
    let stop = arg_f64("linspace", &args.positional[1])?;
    let num = match args.get(2).or_else(|| args.keyword("num")) {
        Some(v) => arg_i64("linspace", v)?,
        None => 50,
    };
    let num = u64::try_from(num)
        .map_err(|_| value_error(format!("Number of samples, {num}, must be non-negative.")))?;
    interp.charge(num)?;
    let data = match num {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (stop - start) / (n - 1) as f64;
            let mut data: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            if let Some(last) = data.last_mut() {
                *last = stop;
            }
            data
        }
    };
    Ok(Value::array(NdArray::from_vec(data)))
}

fn dot(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("dot", &[])?;
    args.expect_count("dot", 2, 2)?;
    let a = NdArray::from_value(&args.positional[0])?;
    let b = NdArray::from_value(&args.positional[1])?;
    a.dot(&b)
}

fn reshape(_: &mut Interpreter, mut args: CallArgs) -> EvalResult {
    args.allow_keywords("reshape", &[])?;
    args.expect_count("reshape", 2, usize::MAX)?;
    let source = args.positional.remove(0);
    let dims = shape_arg("reshape", &args.positional)?;
    Ok(Value::array(NdArray::from_value(&source)?.reshape(&dims)?))
}
