//! `dict` methods. `keys`, `values` and `items` return lists.

use crate::args::CallArgs;
use crate::errors::{key_error, type_error, EvalResult};
use crate::value::repr::repr;
use crate::value::{Dict, Shared, Value};

pub(super) const METHODS: &[&str] = &[
    "clear",
    "copy",
    "get",
    "items",
    "keys",
    "pop",
    "popitem",
    "setdefault",
    "update",
    "values",
];

pub(super) fn call(dict: &Shared<Dict>, name: &str, mut args: CallArgs) -> EvalResult {
    if name == "update" {
        args.expect_count(name, 0, 1)?;
        let mut pairs = Vec::new();
        if let Some(source) = args.positional.first() {
            pairs.extend(update_pairs(source)?);
        }
        pairs.extend(
            args.keywords
                .drain(..)
                .map(|(key, value)| (Value::Str(key), value)),
        );
        let mut dict = dict.borrow_mut();
        for (key, value) in pairs {
            dict.insert(key, value)?;
        }
        return Ok(Value::None);
    }
    args.allow_keywords(name, &[])?;
    match name {
        "get" => {
            args.expect_count(name, 1, 2)?;
            let found = dict.borrow().get(&args.positional[0])?.cloned();
            Ok(found.unwrap_or_else(|| args.get(1).cloned().unwrap_or(Value::None)))
        }
        "setdefault" => {
            args.expect_count(name, 1, 2)?;
            let mut dict = dict.borrow_mut();
            if let Some(found) = dict.get(&args.positional[0])? {
                return Ok(found.clone());
            }
            let default = args.get(1).cloned().unwrap_or(Value::None);
            dict.insert(args.positional[0].clone(), default.clone())?;
            Ok(default)
        }
        "pop" => {
            args.expect_count(name, 1, 2)?;
            match dict.borrow_mut().remove(&args.positional[0])? {
                Some(value) => Ok(value),
                None => args
                    .get(1)
                    .cloned()
                    .ok_or_else(|| key_error(&repr(&args.positional[0]))),
            }
        }
        "popitem" => {
            args.expect_count(name, 0, 0)?;
            let (key, value) = dict
                .borrow_mut()
                .pop_last()
                .ok_or_else(|| key_error("'popitem(): dictionary is empty'"))?;
            Ok(Value::tuple(vec![key, value]))
        }
        "keys" => {
            args.expect_count(name, 0, 0)?;
            Ok(Value::list(dict.borrow().keys().cloned().collect()))
        }
        "values" => {
            args.expect_count(name, 0, 0)?;
            Ok(Value::list(dict.borrow().values().cloned().collect()))
        }
        "items" => {
            args.expect_count(name, 0, 0)?;
            let items = dict
                .borrow()
                .iter()
                .map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()]))
                .collect();
            Ok(Value::list(items))
        }
        "copy" => {
            args.expect_count(name, 0, 0)?;
            Ok(Value::dict(dict.borrow().clone()))
        }
        _ => {
            args.expect_count(name, 0, 0)?;
            dict.borrow_mut().clear();
            Ok(Value::None)
        }
    }
}

/// Key/value pairs from a mapping or an iterable of pairs.
pub(crate) fn update_pairs(source: &Value) -> Result<Vec<(Value, Value)>, crate::errors::EvalError> {
    if let Value::Dict(other) = source {
        return Ok(other
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect());
    }
    let mut pairs = Vec::new();
    for (i, item) in source.iter()?.enumerate() {
        let parts: Vec<Value> = item
            .iter()
            .map_err(|_| {
                type_error(format!(
                    "cannot convert dictionary update sequence element #{i} to a sequence"
                ))
            })?
            .collect();
        let [key, value]: [Value; 2] = parts.try_into().map_err(|parts: Vec<Value>| {
            crate::errors::value_error(format!(
                "dictionary update sequence element #{i} has length {}; 2 is required",
                parts.len()
            ))
        })?;
        pairs.push((key, value));
    }
    Ok(pairs)
}
