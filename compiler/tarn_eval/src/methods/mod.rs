//! Methods on built-in values.
//!
//! Each receiver type has a fixed table of method names. Looking up an
//! attribute in the table yields a bound method; calling it dispatches here
//! by receiver type and name. Nothing outside the tables is reachable.

mod array;
mod dict;
mod list;
mod string;

pub(crate) use array::shape_arg;
pub(crate) use dict::update_pairs;
pub(crate) use list::sort_values;

use crate::args::CallArgs;
use crate::compare::values_equal;
use crate::errors::{no_attribute, value_error, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{Int, Value};

const INT_METHODS: &[&str] = &["bit_length", "conjugate"];
const FLOAT_METHODS: &[&str] = &["conjugate", "is_integer"];
const TUPLE_METHODS: &[&str] = &["count", "index"];

/// Name of `attr` in the method table of `value`'s type.
pub fn lookup(value: &Value, attr: &str) -> Option<&'static str> {
    let table = match value {
        Value::Int(_) | Value::Bool(_) => INT_METHODS,
        Value::Float(_) => FLOAT_METHODS,
        Value::Str(_) => string::METHODS,
        Value::List(_) => list::METHODS,
        Value::Tuple(_) => TUPLE_METHODS,
        Value::Dict(_) => dict::METHODS,
        Value::Array(_) => array::METHODS,
        _ => return None,
    };
    table.iter().copied().find(|name| *name == attr)
}

/// Call method `name` on `receiver`.
pub fn call_method(
    interp: &mut Interpreter,
    receiver: &Value,
    name: &str,
    args: CallArgs,
) -> EvalResult {
    match receiver {
        Value::Int(_) | Value::Bool(_) => int_method(receiver, name, &args),
        Value::Float(f) => float_method(*f, name, &args),
        Value::Str(s) => string::call(interp, s, name, args),
        Value::List(items) => list::call(interp, items, name, args),
        Value::Tuple(items) => tuple_method(items, name, &args),
        Value::Dict(d) => dict::call(d, name, args),
        Value::Array(a) => array::call(a, name, &args),
        other => Err(no_attribute(name, other.type_name())),
    }
}

fn int_method(receiver: &Value, name: &str, args: &CallArgs) -> EvalResult {
    args.expect_count(name, 0, 0)?;
    let value = receiver.as_int().unwrap_or(Int::ZERO);
    match name {
        "bit_length" => Ok(Value::Int(Int::from(value.bit_length() as usize))),
        _ => Ok(Value::Int(value)),
    }
}

fn float_method(value: f64, name: &str, args: &CallArgs) -> EvalResult {
    args.expect_count(name, 0, 0)?;
    match name {
        "is_integer" => Ok(Value::Bool(value.is_finite() && value.fract() == 0.0)),
        _ => Ok(Value::Float(value)),
    }
}

fn tuple_method(items: &[Value], name: &str, args: &CallArgs) -> EvalResult {
    args.expect_count(name, 1, 1)?;
    let needle = &args.positional[0];
    match name {
        "count" => Ok(Value::int(
            items.iter().filter(|x| values_equal(x, needle)).count() as i64,
        )),
        _ => items
            .iter()
            .position(|x| values_equal(x, needle))
            .map(|p| Value::int(p as i64))
            .ok_or_else(|| value_error("tuple.index(x): x not in tuple")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_per_type() {
        assert_eq!(lookup(&Value::from("a"), "upper"), Some("upper"));
        assert_eq!(lookup(&Value::list(Vec::new()), "upper"), None);
        assert_eq!(lookup(&Value::int(3), "bit_length"), Some("bit_length"));
        assert_eq!(lookup(&Value::None, "anything"), None);
    }

    #[test]
    fn tuple_index_reports_missing() {
        let items = [Value::int(1), Value::int(2)];
        let args = CallArgs::new(vec![Value::int(5)]);
        let err = tuple_method(&items, "index", &args);
        assert!(matches!(err, Err(e) if e.message == "tuple.index(x): x not in tuple"));
    }

    #[test]
    fn float_is_integer() {
        let args = CallArgs::default();
        assert!(matches!(float_method(2.0, "is_integer", &args), Ok(Value::Bool(true))));
        assert!(matches!(float_method(2.5, "is_integer", &args), Ok(Value::Bool(false))));
    }
}
