//! Core built-in functions and type constructors.

use std::cmp::Ordering;
use std::rc::Rc;

use num_bigint::BigInt;
use tarn_ir::BinaryOp;

use super::{bind, bind_type};
use crate::args::{arg_i64, arg_int, arg_str, CallArgs};
use crate::compare::compare_values;
use crate::errors::{
    overflow_error, type_error, value_error, wrong_arg_count, EvalError, EvalResult,
};
use crate::interpreter::Interpreter;
use crate::methods::{sort_values, update_pairs};
use crate::namespace::Namespace;
use crate::operators::evaluate_binary;
use crate::value::repr::{repr, to_str};
use crate::value::{Builtin, BuiltinFn, Dict, Int, RangeValue, SliceValue, Value};

/// Builtins that are also types: `type(x)` returns these.
const TYPES: &[(&str, BuiltinFn)] = &[
    ("bool", bool_),
    ("dict", dict),
    ("float", float),
    ("int", int),
    ("list", list),
    ("range", range),
    ("slice", slice),
    ("str", str_),
    ("tuple", tuple),
    ("type", type_),
];

const FUNCTIONS: &[(&str, BuiltinFn)] = &[
    ("abs", abs),
    ("all", all),
    ("any", any),
    ("bin", bin),
    ("callable", callable),
    ("chr", chr),
    ("divmod", divmod),
    ("enumerate", enumerate),
    ("filter", filter),
    ("hex", hex),
    ("isinstance", isinstance),
    ("len", len),
    ("map", map),
    ("max", max),
    ("min", min),
    ("oct", oct),
    ("ord", ord),
    ("pow", pow),
    ("print", print),
    ("repr", repr_),
    ("reversed", reversed),
    ("round", round),
    ("sorted", sorted),
    ("sum", sum),
    ("zip", zip),
];

pub(super) fn register(namespace: &mut Namespace) {
    for &(name, func) in TYPES {
        bind_type(namespace, name, func);
    }
    for &(name, func) in FUNCTIONS {
        bind(namespace, name, func);
    }
}

/// Collect an iterable, charging one step per element up front so huge
/// ranges fail on the budget instead of allocating.
fn materialize(interp: &mut Interpreter, value: &Value) -> Result<Vec<Value>, EvalError> {
    if let Value::Range(r) = value {
        interp.charge(r.len() as u64)?;
    }
    Ok(value.iter()?.collect())
}

/// Integral value of a float, as `int()` and `round()` produce it.
pub(super) fn float_to_int(x: f64) -> Result<Int, EvalError> {
    if x.is_nan() {
        return Err(value_error("cannot convert float NaN to integer"));
    }
    Int::from_f64(x).ok_or_else(|| overflow_error("cannot convert float infinity to integer"))
}

fn one_arg<'a>(name: &str, args: &'a CallArgs) -> Result<&'a Value, EvalError> {
    args.allow_keywords(name, &[])?;
    args.expect_count(name, 1, 1)?;
    Ok(&args.positional[0])
}

// Type constructors

fn bool_(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("bool", &[])?;
    args.expect_count("bool", 0, 1)?;
    match args.get(0) {
        Some(v) => Ok(Value::Bool(v.is_truthy()?)),
        None => Ok(Value::Bool(false)),
    }
}

fn int(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("int", &["base"])?;
    args.expect_count("int", 0, 2)?;
    let base = match args.keyword("base").or(args.get(1)) {
        Some(b) => Some(arg_i64("int", b)?),
        None => None,
    };
    let Some(value) = args.get(0) else {
        return Ok(Value::int(0));
    };
    match (value, base) {
        (Value::Str(s), base) => parse_int(s, base.unwrap_or(10)).map(Value::Int),
        (_, Some(_)) => Err(type_error("int() can't convert non-string with explicit base")),
        (Value::Int(_) | Value::Bool(_), None) => Ok(Value::Int(arg_int("int", value)?)),
        (Value::Float(f), None) => float_to_int(*f).map(Value::Int),
        (other, None) => Err(type_error(format!(
            "int() argument must be a string or a real number, not '{}'",
            other.type_name()
        ))),
    }
}

fn parse_int(text: &str, base: i64) -> Result<Int, EvalError> {
    if base != 0 && !(2..=36).contains(&base) {
        return Err(value_error("int() base must be >= 2 and <= 36, or 0"));
    }
    let invalid = || value_error(format!("invalid literal for int() with base {base}: {}", repr(&Value::from(text))));
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let lower = unsigned.to_ascii_lowercase();
    let prefixed = |p: &str| lower.strip_prefix(p).map(str::to_string);
    let (radix, digits) = match base {
        0 | 16 if lower.starts_with("0x") => (16, prefixed("0x")),
        0 | 8 if lower.starts_with("0o") => (8, prefixed("0o")),
        0 | 2 if lower.starts_with("0b") => (2, prefixed("0b")),
        0 => (10, Some(lower.clone())),
        b => (b as u32, Some(lower.clone())),
    };
    let digits = digits.ok_or_else(invalid)?;
    let digits = digits.strip_prefix('_').unwrap_or(&digits);
    if digits.is_empty() || digits.ends_with('_') || digits.contains("__") {
        return Err(invalid());
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let magnitude = BigInt::parse_bytes(cleaned.as_bytes(), radix).ok_or_else(invalid)?;
    Ok(Int::from_bigint(if negative { -magnitude } else { magnitude }))
}

fn float(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("float", &[])?;
    args.expect_count("float", 0, 1)?;
    let Some(value) = args.get(0) else {
        return Ok(Value::Float(0.0));
    };
    match value {
        Value::Str(s) => {
            let cleaned = s.trim();
            cleaned
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| value_error(format!("could not convert string to float: {}", repr(value))))
        }
        Value::Int(i) => {
            let x = i.to_f64();
            if x.is_infinite() {
                return Err(overflow_error("int too large to convert to float"));
            }
            Ok(Value::Float(x))
        }
        other => other.as_f64().map(Value::Float).ok_or_else(|| {
            type_error(format!(
                "float() argument must be a string or a real number, not '{}'",
                other.type_name()
            ))
        }),
    }
}

fn str_(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("str", &[])?;
    args.expect_count("str", 0, 1)?;
    Ok(Value::from(args.get(0).map(to_str).unwrap_or_default()))
}

fn list(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("list", &[])?;
    args.expect_count("list", 0, 1)?;
    match args.get(0) {
        Some(v) => Ok(Value::list(materialize(interp, v)?)),
        None => Ok(Value::list(Vec::new())),
    }
}

fn tuple(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("tuple", &[])?;
    args.expect_count("tuple", 0, 1)?;
    match args.get(0) {
        Some(Value::Tuple(t)) => Ok(Value::Tuple(t.clone())),
        Some(v) => Ok(Value::tuple(materialize(interp, v)?)),
        None => Ok(Value::tuple(Vec::new())),
    }
}

fn dict(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.expect_count("dict", 0, 1)?;
    let mut out = Dict::new();
    if let Some(source) = args.get(0) {
        for (key, value) in update_pairs(source)? {
            out.insert(key, value)?;
        }
    }
    for (key, value) in args.keywords {
        out.insert(Value::Str(key), value)?;
    }
    Ok(Value::dict(out))
}

fn range(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("range", &[])?;
    args.expect_count("range", 1, 3)?;
    let nums = args
        .positional
        .iter()
        .map(|v| arg_i64("range", v))
        .collect::<Result<Vec<_>, _>>()?;
    let (start, stop, step) = match nums.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(wrong_arg_count("range", "1 to 3", nums.len())),
    };
    if step == 0 {
        return Err(value_error("range() arg 3 must not be zero"));
    }
    Ok(Value::Range(RangeValue { start, stop, step }))
}

fn slice(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("slice", &[])?;
    args.expect_count("slice", 1, 3)?;
    let mut parts = args.positional;
    let (start, stop, step) = match parts.len() {
        1 => (Value::None, parts.remove(0), Value::None),
        2 => {
            let stop = parts.remove(1);
            (parts.remove(0), stop, Value::None)
        }
        _ => {
            let step = parts.remove(2);
            let stop = parts.remove(1);
            (parts.remove(0), stop, step)
        }
    };
    Ok(Value::Slice(Rc::new(SliceValue { start, stop, step })))
}

fn type_(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    let value = one_arg("type", &args)?;
    if let Value::Exception(e) = value {
        return Ok(Value::ExcType(e.exc));
    }
    let name = value.type_name();
    let func = TYPES
        .iter()
        .find(|(type_name, _)| *type_name == name)
        .map_or(not_constructible as BuiltinFn, |&(_, func)| func);
    Ok(Value::Builtin(Builtin {
        name,
        func,
        is_type: true,
    }))
}

fn not_constructible(_: &mut Interpreter, _: CallArgs) -> EvalResult {
    Err(type_error("cannot create instances of this type"))
}

// Introspection

fn isinstance(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("isinstance", &[])?;
    args.expect_count("isinstance", 2, 2)?;
    instance_of(&args.positional[0], &args.positional[1]).map(Value::Bool)
}

fn instance_of(value: &Value, class: &Value) -> Result<bool, EvalError> {
    match class {
        Value::Tuple(options) => {
            for option in options.iter() {
                if instance_of(value, option)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Value::ExcType(t) => Ok(matches!(value, Value::Exception(e) if e.exc.is_subclass_of(*t))),
        Value::Builtin(b) if b.is_type => Ok(match b.name {
            "int" => matches!(value, Value::Int(_) | Value::Bool(_)),
            "type" => matches!(
                value,
                Value::ExcType(_) | Value::Builtin(Builtin { is_type: true, .. })
            ),
            name => value.type_name() == name,
        }),
        _ => Err(type_error(
            "isinstance() arg 2 must be a type or tuple of types",
        )),
    }
}

fn callable(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    Ok(Value::Bool(one_arg("callable", &args)?.is_callable()))
}

fn len(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    let n = one_arg("len", &args)?.len()?;
    Ok(Value::Int(Int::from(n)))
}

fn repr_(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    Ok(Value::from(repr(one_arg("repr", &args)?)))
}

// Numbers

fn abs(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    match one_arg("abs", &args)? {
        Value::Int(i) => Ok(Value::Int(i.abs())),
        Value::Bool(b) => Ok(Value::int(i64::from(*b))),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        Value::Array(a) => Ok(Value::array(a.borrow().map(f64::abs))),
        other => Err(type_error(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))),
    }
}

fn divmod(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("divmod", &[])?;
    args.expect_count("divmod", 2, 2)?;
    let (a, b) = (&args.positional[0], &args.positional[1]);
    if !(a.is_number() && b.is_number()) {
        return Err(type_error(format!(
            "unsupported operand type(s) for divmod(): '{}' and '{}'",
            a.type_name(),
            b.type_name()
        )));
    }
    let limits = *interp.limits();
    let quotient = evaluate_binary(a, b, BinaryOp::FloorDiv, &limits)?;
    let remainder = evaluate_binary(a, b, BinaryOp::Mod, &limits)?;
    Ok(Value::tuple(vec![quotient, remainder]))
}

fn pow(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("pow", &[])?;
    args.expect_count("pow", 2, 3)?;
    let limits = *interp.limits();
    let (base, exponent) = (&args.positional[0], &args.positional[1]);
    let Some(modulus) = args.get(2) else {
        return evaluate_binary(base, exponent, BinaryOp::Pow, &limits);
    };
    let (Some(b), Some(e), Some(m)) = (base.as_int(), exponent.as_int(), modulus.as_int()) else {
        return Err(type_error(
            "pow() 3rd argument not allowed unless all arguments are integers",
        ));
    };
    if m.is_zero() {
        return Err(value_error("pow() 3rd argument cannot be 0"));
    }
    if e.is_negative() {
        return Err(value_error("pow() negative exponent with modulus is not supported"));
    }
    Ok(Value::Int(b.pow_mod(&e, &m)))
}

fn round(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("round", &["ndigits"])?;
    args.expect_count("round", 1, 2)?;
    let ndigits = match args.keyword("ndigits").or(args.get(1)) {
        None | Some(Value::None) => None,
        Some(n) => Some(arg_i64("round", n)?),
    };
    match (&args.positional[0], ndigits) {
        (Value::Float(x), None) => float_to_int(x.round_ties_even()).map(Value::Int),
        (Value::Float(x), Some(n)) => Ok(Value::Float(round_float(*x, n))),
        (v @ (Value::Int(_) | Value::Bool(_)), n) => {
            let i = arg_int("round", v)?;
            match n {
                Some(n) if n < 0 => Ok(Value::Int(round_int(&i, n))),
                _ => Ok(Value::Int(i)),
            }
        }
        (other, _) => Err(type_error(format!(
            "type {} doesn't define __round__ method",
            other.type_name()
        ))),
    }
}

fn round_float(x: f64, ndigits: i64) -> f64 {
    if !x.is_finite() || ndigits > 308 {
        return x;
    }
    if ndigits < -308 {
        return 0.0_f64.copysign(x);
    }
    let scale = 10f64.powi(ndigits as i32);
    let rounded = (x * scale).round_ties_even() / scale;
    if rounded.is_finite() {
        rounded
    } else {
        x
    }
}

/// Round to `10**-ndigits`, ties to even.
fn round_int(value: &Int, ndigits: i64) -> Int {
    let exponent = u32::try_from(-ndigits).unwrap_or(u32::MAX).min(4_000);
    let unit = Int::from_i64(10).pow(exponent);
    let (Some(q), Some(r)) = (value.floor_div(&unit), value.modulo(&unit)) else {
        return value.clone();
    };
    let twice = r.add(&r);
    let up = match twice.cmp(&unit) {
        Ordering::Greater => true,
        Ordering::Equal => q.modulo(&Int::from_i64(2)).is_some_and(|odd| !odd.is_zero()),
        Ordering::Less => false,
    };
    let q = if up { q.add(&Int::ONE) } else { q };
    q.mul(&unit)
}

fn radix(name: &str, args: &CallArgs, radix: u32, prefix: &str) -> EvalResult {
    let value = one_arg(name, args)?;
    Ok(Value::from(arg_int(name, value)?.to_radix_string(radix, prefix)))
}

fn bin(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    radix("bin", &args, 2, "0b")
}

fn oct(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    radix("oct", &args, 8, "0o")
}

fn hex(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    radix("hex", &args, 16, "0x")
}

fn chr(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    let code = arg_int("chr", one_arg("chr", &args)?)?;
    code.to_i64()
        .and_then(|c| u32::try_from(c).ok())
        .and_then(char::from_u32)
        .map(|c| Value::from(c.to_string()))
        .ok_or_else(|| value_error("chr() arg not in range(0x110000)"))
}

fn ord(_: &mut Interpreter, args: CallArgs) -> EvalResult {
    let text = arg_str("ord", one_arg("ord", &args)?)?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::int(i64::from(u32::from(c)))),
        _ => Err(type_error(format!(
            "ord() expected a character, but string of length {} found",
            text.chars().count()
        ))),
    }
}

// Iteration

fn all(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    for item in materialize(interp, one_arg("all", &args)?)? {
        if !item.is_truthy()? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn any(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    for item in materialize(interp, one_arg("any", &args)?)? {
        if item.is_truthy()? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn enumerate(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("enumerate", &["start"])?;
    args.expect_count("enumerate", 1, 2)?;
    let start = match args.keyword("start").or(args.get(1)) {
        Some(s) => arg_int("enumerate", s)?,
        None => Int::ZERO,
    };
    let items = materialize(interp, &args.positional[0])?;
    let mut index = start;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(Value::tuple(vec![Value::Int(index.clone()), item]));
        index = index.add(&Int::ONE);
    }
    Ok(Value::list(out))
}

fn filter(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("filter", &[])?;
    args.expect_count("filter", 2, 2)?;
    let predicate = args.positional[0].clone();
    let mut out = Vec::new();
    for item in materialize(interp, &args.positional[1])? {
        let keep = match &predicate {
            Value::None => item.is_truthy()?,
            f => interp.call_value(f, CallArgs::new(vec![item.clone()]))?.is_truthy()?,
        };
        if keep {
            out.push(item);
        }
    }
    Ok(Value::list(out))
}

fn map(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("map", &[])?;
    args.expect_count("map", 2, usize::MAX)?;
    let func = args.positional[0].clone();
    let columns = args.positional[1..]
        .iter()
        .map(|it| materialize(interp, it))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(rows);
    for row in 0..rows {
        let call_args = CallArgs::new(columns.iter().map(|c| c[row].clone()).collect());
        out.push(interp.call_value(&func, call_args)?);
    }
    Ok(Value::list(out))
}

fn zip(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("zip", &[])?;
    let columns = args
        .positional
        .iter()
        .map(|it| materialize(interp, it))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
    let out = (0..rows)
        .map(|row| Value::tuple(columns.iter().map(|c| c[row].clone()).collect()))
        .collect();
    Ok(Value::list(out))
}

fn reversed(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    let value = one_arg("reversed", &args)?;
    if matches!(value, Value::Dict(_)) {
        return Err(type_error("'dict' object is not reversible"));
    }
    let mut items = materialize(interp, value)?;
    items.reverse();
    Ok(Value::list(items))
}

fn sorted(interp: &mut Interpreter, mut args: CallArgs) -> EvalResult {
    args.allow_keywords("sorted", &["key", "reverse"])?;
    args.expect_count("sorted", 1, 1)?;
    let key = args.take_keyword("key").filter(|k| !matches!(k, Value::None));
    let reverse = match args.take_keyword("reverse") {
        Some(flag) => flag.is_truthy()?,
        None => false,
    };
    let items = materialize(interp, &args.positional[0])?;
    Ok(Value::list(sort_values(interp, items, key.as_ref(), reverse)?))
}

fn sum(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    args.allow_keywords("sum", &["start"])?;
    args.expect_count("sum", 1, 2)?;
    let start = args.keyword("start").or(args.get(1)).cloned().unwrap_or(Value::int(0));
    if matches!(start, Value::Str(_)) {
        return Err(type_error("sum() can't sum strings [use ''.join(seq) instead]"));
    }
    let limits = *interp.limits();
    let mut total = start;
    for item in materialize(interp, &args.positional[0])? {
        total = evaluate_binary(&total, &item, BinaryOp::Add, &limits)?;
    }
    Ok(total)
}

fn max(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    extremum(interp, "max", args, Ordering::Greater)
}

fn min(interp: &mut Interpreter, args: CallArgs) -> EvalResult {
    extremum(interp, "min", args, Ordering::Less)
}

fn extremum(interp: &mut Interpreter, name: &str, mut args: CallArgs, wanted: Ordering) -> EvalResult {
    args.allow_keywords(name, &["key", "default"])?;
    let key = args.take_keyword("key").filter(|k| !matches!(k, Value::None));
    let default = args.take_keyword("default");
    let items = match args.positional.len() {
        0 => return Err(wrong_arg_count(name, "at least 1 argument", 0)),
        1 => materialize(interp, &args.positional[0])?,
        _ if default.is_some() => {
            return Err(type_error(format!(
                "Cannot specify a default for {name}() with multiple positional arguments"
            )))
        }
        _ => args.positional,
    };
    let op = if wanted == Ordering::Greater { ">" } else { "<" };
    let mut best: Option<(Value, Value)> = None;
    for item in items {
        let rank = match &key {
            Some(f) => interp.call_value(f, CallArgs::new(vec![item.clone()]))?,
            None => item.clone(),
        };
        let better = match &best {
            None => true,
            Some((_, best_rank)) => compare_values(op, &rank, best_rank)? == Some(wanted),
        };
        if better {
            best = Some((item, rank));
        }
    }
    match best {
        Some((item, _)) => Ok(item),
        None => default.ok_or_else(|| value_error(format!("{name}() arg is an empty sequence"))),
    }
}

// Output

fn print(interp: &mut Interpreter, mut args: CallArgs) -> EvalResult {
    args.allow_keywords("print", &["sep", "end"])?;
    let mut text_of = |name: &str, default: &str| -> Result<String, EvalError> {
        match args.take_keyword(name) {
            None | Some(Value::None) => Ok(default.to_string()),
            Some(Value::Str(s)) => Ok(s.to_string()),
            Some(other) => Err(type_error(format!(
                "{name} must be None or a string, not {}",
                other.type_name()
            ))),
        }
    };
    let sep = text_of("sep", " ")?;
    let end = text_of("end", "\n")?;
    let mut line = args.positional.iter().map(to_str).collect::<Vec<_>>().join(&sep);
    line.push_str(&end);
    interp.writer().write(&line);
    Ok(Value::None)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn parse_int_handles_prefixes_and_underscores() {
        assert_eq!(parse_int("0x_ff", 0).unwrap(), Int::from_i64(255));
        assert_eq!(parse_int(" -1_000 ", 10).unwrap(), Int::from_i64(-1000));
        assert_eq!(parse_int("z", 36).unwrap(), Int::from_i64(35));
        assert!(parse_int("1__0", 10).is_err());
        assert!(parse_int("12", 1).is_err());
        let err = parse_int("abc", 10).unwrap_err();
        assert_eq!(err.message, "invalid literal for int() with base 10: 'abc'");
    }

    #[test]
    fn round_int_ties_to_even() {
        assert_eq!(round_int(&Int::from_i64(25), -1), Int::from_i64(20));
        assert_eq!(round_int(&Int::from_i64(35), -1), Int::from_i64(40));
        assert_eq!(round_int(&Int::from_i64(-151), -2), Int::from_i64(-200));
    }

    #[test]
    fn isinstance_treats_bool_as_int() {
        let int_type = Value::Builtin(Builtin { name: "int", func: int, is_type: true });
        assert!(instance_of(&Value::Bool(true), &int_type).unwrap());
        assert!(!instance_of(&Value::Float(1.0), &int_type).unwrap());
        let err = Value::exception(crate::value::ExcType::ZeroDivisionError, Vec::new());
        let arith = Value::ExcType(crate::value::ExcType::ArithmeticError);
        assert!(instance_of(&err, &arith).unwrap());
    }

    #[test]
    fn float_conversion_messages() {
        assert!(float_to_int(f64::NAN).is_err());
        assert!(matches!(float_to_int(f64::INFINITY), Err(e) if e.exc == crate::value::ExcType::OverflowError));
    }
}
