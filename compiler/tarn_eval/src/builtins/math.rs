//! Math bindings.
//!
//! Scalar functions follow the libm conventions scripts expect: inputs
//! outside the domain raise `ValueError("math domain error")` and finite
//! inputs that overflow raise `OverflowError("math range error")`. Given an
//! array, the one-argument functions apply elementwise and never raise;
//! out-of-domain elements become NaN.

use num_integer::Integer;

use super::base::float_to_int;
use super::bind;
use crate::args::{arg_f64, arg_i64, arg_int, CallArgs};
use crate::errors::{
    division_by_zero, factorial_too_large, math_domain_error, math_range_error, type_error,
    value_error, EvalError, EvalResult,
};
use crate::interpreter::Interpreter;
use crate::namespace::Namespace;
use crate::value::{BuiltinFn, DType, Int, Value};

/// Largest `n` accepted by `factorial`.
pub const MAX_FACTORIAL: u64 = 5_000;

macro_rules! unary {
    ($($name:ident => $f:expr, $domain:expr;)*) => {
        $(
            fn $name(_: &mut Interpreter, args: CallArgs) -> EvalResult {
                apply_unary(stringify!($name), &args, $f, $domain)
            }
        )*
        const UNARY: &[(&str, BuiltinFn)] = &[$((stringify!($name), $name)),*];
    };
}

unary! {
    acos => f64::acos, |x| (-1.0..=1.0).contains(&x);
    acosh => f64::acosh, |x| x >= 1.0;
    asin => f64::asin, |x| (-1.0..=1.0).contains(&x);
    asinh => f64::asinh, |_| true;
    atan => f64::atan, |_| true;
    atanh => f64::atanh, |x| x > -1.0 && x < 1.0;
    cos => f64::cos, |x| !x.is_infinite();
    cosh => f64::cosh, |_| true;
    degrees => f64::to_degrees, |_| true;
    exp => f64::exp, |_| true;
    expm1 => f64::exp_m1, |_| true;
    fabs => f64::abs, |_| true;
    log10 => f64::log10, |x| x > 0.0;
    log1p => f64::ln_1p, |x| x > -1.0;
    log2 => f64::log2, |x| x > 0.0;
    radians => f64::to_radians, |_| true;
    sin => f64::sin, |x| !x.is_infinite();
    sinh => f64::sinh, |_| true;
    sqrt => f64::sqrt, |x| x >= 0.0;
    tan => f64::tan, |x| !x.is_infinite();
    tanh => f64::tanh, |_| true;
}

const OTHERS: &[(&str, BuiltinFn)] = &[
    ("atan2", atan2),
    ("ceil", ceil),
    ("copysign", copysign),
    ("factorial", factorial),
    ("floor", floor),
    ("fmod", fmod),
    ("frexp", frexp),
    ("fsum", fsum),
    ("gcd", gcd),
    ("hypot", hypot),
    ("isfinite", isfinite),
    ("isinf", isinf),
    ("isnan", isnan),
    ("ldexp", ldexp),
    ("log", log),
    ("modf", modf),
    ("trunc", trunc),
];

pub(super) fn register(namespace: &mut Namespace) {
    for &(name, func) in UNARY.iter().chain(OTHERS) {
        bind(namespace, name, func);
    }
    for (name, value) in [
        ("e", std::f64::consts::E),
        ("pi", std::f64::consts::PI),
        ("tau", std::f64::consts::TAU),
        ("inf", f64::INFINITY),
        ("nan", f64::NAN),
    ] {
        namespace.insert(name.into(), Value::Float(value));
    }
}

fn apply_unary(name: &str, args: &CallArgs, f: fn(f64) -> f64, domain: fn(f64) -> bool) -> EvalResult {
    args.allow_keywords(name, &[])?;
    args.expect_count(name, 1, 1)?;
    if let Value::Array(a) = &args.positional[0] {
        return Ok(Value::array(a.borrow().map(|x| if domain(x) { f(x) } else { f64::NAN })));
    }
    let x = arg_f64(name, &args.positional[0])?;
    checked(x.is_nan() || domain(x), x.is_finite(), f(x))
}

/// Apply the domain and range rules to a computed result.
fn checked(in_domain: bool, finite_input: bool, result: f64) -> EvalResult {
    if !in_domain {
        return Err(math_domain_error());
    }
    if result.is_infinite() && finite_input {
        return Err(math_range_error());
    }
    Ok(Value::Float(result))
}

fn two_floats(name: &str, args: &CallArgs) -> Result<(f64, f64), EvalError> {
    args.allow_keywords(name, &[])?;
    args.expect_count(name, 2, 2)?;
    Ok((arg_f64(name, &args.positional[0])?, arg_f64(name, &args.positional[1])?))
}

fn one_float(name: &str, args: &CallArgs) -> Result<f64, EvalError> {
    args.allow_keywords(name, &[])?;
    args.expect_count(name, 1, 1)?;
    arg_f64(name, &args.positional[0])
}

fn atan2(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    let (y, x) = two_floats("atan2", &args)?;
    Ok(Value::Float(y.atan2(x)))
}

fn copysign(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    let (x, y) = two_floats("copysign", &args)?;
    Ok(Value::Float(x.copysign(y)))
}

fn fmod(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    let (x, y) = two_floats("fmod", &args)?;
    if y == 0.0 || x.is_infinite() {
        return Err(math_domain_error());
    }
    Ok(Value::Float(x % y))
}

fn hypot(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("hypot", &[])?;
    let mut acc = 0.0_f64;
    for value in &args.positional {
        acc = acc.hypot(arg_f64("hypot", value)?);
    }
    Ok(Value::Float(acc))
}

fn log(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("log", &[])?;
    args.expect_count("log", 1, 2)?;
    let ln = |v: &Value| -> Result<f64, EvalError> {
        // Big ints beyond f64 range still have a finite logarithm.
        if let Value::Int(i) = v {
            if !i.is_negative() && !i.is_zero() && i.to_f64().is_infinite() {
                let bits = i.bit_length();
                let shifted = i.shr(bits - 53).to_f64();
                return Ok(shifted.ln() + (bits - 53) as f64 * std::f64::consts::LN_2);
            }
        }
        let x = arg_f64("log", v)?;
        if x <= 0.0 {
            return Err(math_domain_error());
        }
        Ok(x.ln())
    };
    let value = ln(&args.positional[0])?;
    match args.get(1) {
        None => Ok(Value::Float(value)),
        Some(base) => {
            let base = ln(base)?;
            if base == 0.0 {
                return Err(division_by_zero("float division by zero"));
            }
            Ok(Value::Float(value / base))
        }
    }
}

fn rounding(name: &str, args: &CallArgs, f: fn(f64) -> f64) -> EvalResult {
    args.allow_keywords(name, &[])?;
    args.expect_count(name, 1, 1)?;
    match &args.positional[0] {
        Value::Int(i) => Ok(Value::Int(i.clone())),
        Value::Bool(b) => Ok(Value::int(i64::from(*b))),
        other => float_to_int(f(arg_f64(name, other)?)).map(Value::Int),
    }
}

fn ceil(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    rounding("ceil", &args, f64::ceil)
}

fn floor(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    rounding("floor", &args, f64::floor)
}

fn trunc(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    rounding("trunc", &args, f64::trunc)
}

fn predicate(name: &str, args: &CallArgs, f: fn(f64) -> bool) -> EvalResult {
    if let Some(Value::Array(a)) = args.get(0) {
        args.expect_count(name, 1, 1)?;
        let a = a.borrow();
        let mapped = a.map(|x| if f(x) { 1.0 } else { 0.0 });
        return Ok(Value::array(mapped.with_dtype(DType::Bool)));
    }
    Ok(Value::Bool(f(one_float(name, args)?)))
}

fn isfinite(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    predicate("isfinite", &args, f64::is_finite)
}

fn isinf(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    predicate("isinf", &args, f64::is_infinite)
}

fn isnan(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    predicate("isnan", &args, f64::is_nan)
}

fn frexp(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    let (mantissa, exponent) = split_float(one_float("frexp", &args)?);
    Ok(Value::tuple(vec![Value::Float(mantissa), Value::int(i64::from(exponent))]))
}

/// `x == m * 2**e` with `0.5 <= |m| < 1`.
fn split_float(x: f64) -> (f64, i32) {
    if x == 0.0 || !x.is_finite() {
        return (x, 0);
    }
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    if biased == 0 {
        let (m, e) = split_float(x * 2f64.powi(54));
        return (m, e - 54);
    }
    let mantissa = f64::from_bits((bits & !(0x7ff_u64 << 52)) | (1022_u64 << 52));
    (mantissa, biased - 1022)
}

fn ldexp(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("ldexp", &[])?;
    args.expect_count("ldexp", 2, 2)?;
    let x = arg_f64("ldexp", &args.positional[0])?;
    let e = arg_i64("ldexp", &args.positional[1])?.clamp(-2200, 2200) as i32;
    // Two steps so tiny mantissas with large exponents do not overflow early.
    let half = e / 2;
    let result = x * 2f64.powi(half) * 2f64.powi(e - half);
    checked(true, x.is_finite(), result)
}

fn modf(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    let x = one_float("modf", &args)?;
    let whole = x.trunc();
    let fraction = if x.is_infinite() { 0.0_f64.copysign(x) } else { x - whole };
    Ok(Value::tuple(vec![Value::Float(fraction), Value::Float(whole)]))
}

fn factorial(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("factorial", &[])?;
    args.expect_count("factorial", 1, 1)?;
    let n = match &args.positional[0] {
        Value::Float(_) => {
            return Err(type_error(
                "'float' object cannot be interpreted as an integer",
            ))
        }
        other => arg_int("factorial", other)?,
    };
    if n.is_negative() {
        return Err(value_error("factorial() not defined for negative values"));
    }
    let n = match n.to_i64().and_then(|v| u64::try_from(v).ok()) {
        Some(v) if v <= MAX_FACTORIAL => v,
        _ => {
            tracing::warn!(max = MAX_FACTORIAL, "factorial argument limit exceeded");
            return Err(factorial_too_large(MAX_FACTORIAL));
        }
    };
    interp.charge(n)?;
    let mut acc = Int::ONE;
    for k in 2..=n {
        acc = acc.mul(&Int::from_i64(k as i64));
    }
    Ok(Value::Int(acc))
}

fn gcd(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("gcd", &[])?;
    let mut acc = num_bigint::BigInt::from(0);
    for value in &args.positional {
        acc = acc.gcd(&arg_int("gcd", value)?.to_bigint());
    }
    Ok(Value::Int(Int::from_bigint(acc)))
}

/// Exactly rounded sum (Shewchuk's algorithm).
fn fsum(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("fsum", &[])?;
    args.expect_count("fsum", 1, 1)?;
    let source = &args.positional[0];
    if let Value::Range(r) = source {
        interp.charge(r.len() as u64)?;
    }
    let mut partials: Vec<f64> = Vec::new();
    let mut special = 0.0_f64;
    for item in source.iter()? {
        let mut x = arg_f64("fsum", &item)?;
        if !x.is_finite() {
            special += x;
            continue;
        }
        let mut kept = 0;
        for j in 0..partials.len() {
            let mut y = partials[j];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            let lo = y - (hi - x);
            if lo != 0.0 {
                partials[kept] = lo;
                kept += 1;
            }
            x = hi;
        }
        partials.truncate(kept);
        partials.push(x);
    }
    if special != 0.0 || special.is_nan() {
        return Ok(Value::Float(special));
    }
    let total: f64 = partials.iter().rev().fold(0.0, |acc, p| {
        let hi = acc + p;
        if hi.is_infinite() {
            hi
        } else {
            hi + (p - (hi - acc))
        }
    });
    if total.is_infinite() {
        return Err(math_range_error());
    }
    Ok(Value::Float(total))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    fn call(f: BuiltinFn, args: Vec<Value>) -> EvalResult {
        let mut interp = Interpreter::new();
        f(&mut interp, CallArgs::new(args))
    }

    #[test]
    fn domain_and_range_errors() {
        let err = call(sqrt, vec![Value::Float(-1.0)]).unwrap_err();
        assert_eq!(err.message, "math domain error");
        let err = call(exp, vec![Value::Float(1000.0)]).unwrap_err();
        assert_eq!(err.message, "math range error");
        assert_eq!(call(sqrt, vec![Value::int(16)]).unwrap(), Value::Float(4.0));
    }

    #[test]
    fn fsum_is_exact() {
        let items = Value::list(vec![Value::Float(0.1); 10]);
        assert_eq!(call(fsum, vec![items]).unwrap(), Value::Float(1.0));
        let cancel = Value::list(vec![Value::Float(1e100), Value::Float(1.0), Value::Float(-1e100)]);
        assert_eq!(call(fsum, vec![cancel]).unwrap(), Value::Float(1.0));
    }

    #[test]
    fn frexp_round_trips() {
        for x in [1.0, -3.5, 1e-310, 123_456.789] {
            let (m, e) = split_float(x);
            assert!((0.5..1.0).contains(&m.abs()));
            assert_eq!(m * 2f64.powi(e), x);
        }
    }

    #[test]
    fn factorial_is_guarded() {
        assert_eq!(call(factorial, vec![Value::int(5)]).unwrap(), Value::int(120));
        let err = call(factorial, vec![Value::int(1_000_000)]).unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::Resource);
        assert!(call(factorial, vec![Value::int(-1)]).is_err());
    }

    #[test]
    fn log_handles_huge_ints() {
        let huge = Value::Int(Int::from_i64(10).pow(400));
        let Value::Float(ln) = call(log, vec![huge]).unwrap() else {
            panic!("expected float");
        };
        assert!((ln - 400.0 * std::f64::consts::LN_10).abs() < 1e-9);
    }
}
