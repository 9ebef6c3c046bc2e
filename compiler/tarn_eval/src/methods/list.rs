//! `list` methods, and the sort shared with `sorted()`.

use std::cmp::Ordering;

use crate::args::{arg_i64, CallArgs};
use crate::compare::{compare_values, values_equal};
use crate::errors::{index_error, value_error, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::repr::repr;
use crate::value::{Shared, Value};

pub(super) const METHODS: &[&str] = &[
    "append", "clear", "copy", "count", "extend", "index", "insert", "pop", "remove", "reverse",
    "sort",
];

pub(super) fn call(
    interp: &mut Interpreter,
    items: &Shared<Vec<Value>>,
    name: &str,
    mut args: CallArgs,
) -> EvalResult {
    if name == "sort" {
        args.allow_keywords(name, &["key", "reverse"])?;
        args.expect_count(name, 0, 0)?;
        let key = args.take_keyword("key").filter(|k| !matches!(k, Value::None));
        let reverse = match args.take_keyword("reverse") {
            Some(flag) => flag.is_truthy()?,
            None => false,
        };
        let snapshot = items.borrow().clone();
        let sorted = sort_values(interp, snapshot, key.as_ref(), reverse)?;
        *items.borrow_mut() = sorted;
        return Ok(Value::None);
    }
    args.allow_keywords(name, &[])?;
    match name {
        "append" => {
            args.expect_count(name, 1, 1)?;
            items.borrow_mut().extend(args.positional);
            Ok(Value::None)
        }
        "extend" => {
            args.expect_count(name, 1, 1)?;
            let extra: Vec<Value> = args.positional[0].iter()?.collect();
            interp.charge(extra.len() as u64)?;
            items.borrow_mut().extend(extra);
            Ok(Value::None)
        }
        "insert" => {
            args.expect_count(name, 2, 2)?;
            let mut items = items.borrow_mut();
            let len = items.len() as i64;
            let at = arg_i64(name, &args.positional[0])?;
            let at = if at < 0 { (at + len).max(0) } else { at.min(len) };
            let value = args.positional.swap_remove(1);
            items.insert(at as usize, value);
            Ok(Value::None)
        }
        "pop" => {
            args.expect_count(name, 0, 1)?;
            let mut items = items.borrow_mut();
            if items.is_empty() {
                return Err(index_error("pop from empty list"));
            }
            let len = items.len() as i64;
            let at = match args.get(0) {
                Some(i) => arg_i64(name, i)?,
                None => -1,
            };
            let at = if at < 0 { at + len } else { at };
            if !(0..len).contains(&at) {
                return Err(index_error("pop index out of range"));
            }
            Ok(items.remove(at as usize))
        }
        "remove" => {
            args.expect_count(name, 1, 1)?;
            let mut items = items.borrow_mut();
            let pos = items
                .iter()
                .position(|x| values_equal(x, &args.positional[0]))
                .ok_or_else(|| value_error("list.remove(x): x not in list"))?;
            items.remove(pos);
            Ok(Value::None)
        }
        "index" => {
            args.expect_count(name, 1, 3)?;
            let items = items.borrow();
            let len = items.len() as i64;
            let bound = |i: usize, default: i64| -> Result<usize, EvalError> {
                let raw = match args.get(i) {
                    Some(v) => arg_i64(name, v)?,
                    None => default,
                };
                let clamped = if raw < 0 { (raw + len).max(0) } else { raw.min(len) };
                Ok(clamped as usize)
            };
            let (start, stop) = (bound(1, 0)?, bound(2, len)?);
            let needle = &args.positional[0];
            (start..stop.max(start))
                .find(|&p| values_equal(&items[p], needle))
                .map(|p| Value::int(p as i64))
                .ok_or_else(|| value_error(format!("{} is not in list", repr(needle))))
        }
        "count" => {
            args.expect_count(name, 1, 1)?;
            let needle = &args.positional[0];
            let n = items.borrow().iter().filter(|x| values_equal(x, needle)).count();
            Ok(Value::int(n as i64))
        }
        "reverse" => {
            args.expect_count(name, 0, 0)?;
            items.borrow_mut().reverse();
            Ok(Value::None)
        }
        "copy" => {
            args.expect_count(name, 0, 0)?;
            Ok(Value::list(items.borrow().clone()))
        }
        _ => {
            args.expect_count(name, 0, 0)?;
            items.borrow_mut().clear();
            Ok(Value::None)
        }
    }
}

/// Stable sort with fallible comparisons and an optional key function.
///
/// `reverse` keeps equal elements in their original order, like the
/// ascending sort does. Unordered pairs (NaN) compare as equal.
pub(crate) fn sort_values(
    interp: &mut Interpreter,
    items: Vec<Value>,
    key: Option<&Value>,
    reverse: bool,
) -> Result<Vec<Value>, EvalError> {
    interp.charge(items.len() as u64)?;
    let keys = match key {
        Some(key) => {
            let mut keys = Vec::with_capacity(items.len());
            for item in &items {
                keys.push(interp.call_value(key, CallArgs::new(vec![item.clone()]))?);
            }
            keys
        }
        None => items.clone(),
    };
    let mut order: Vec<usize> = (0..items.len()).collect();
    let precedes = |a: usize, b: usize| -> Result<bool, EvalError> {
        let ord = compare_values("<", &keys[b], &keys[a])?.unwrap_or(Ordering::Equal);
        Ok(if reverse {
            ord == Ordering::Greater
        } else {
            ord == Ordering::Less
        })
    };
    merge_sort(&mut order, &precedes)?;
    let mut slots: Vec<Option<Value>> = items.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

/// `takes_right(l, r)` says whether `r` must come before `l`.
fn merge_sort(
    order: &mut [usize],
    takes_right: &impl Fn(usize, usize) -> Result<bool, EvalError>,
) -> Result<(), EvalError> {
    if order.len() < 2 {
        return Ok(());
    }
    let mid = order.len() / 2;
    merge_sort(&mut order[..mid], takes_right)?;
    merge_sort(&mut order[mid..], takes_right)?;
    let (left, right) = order.split_at(mid);
    let mut merged = Vec::with_capacity(order.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if takes_right(left[i], right[j])? {
            merged.push(right[j]);
            j += 1;
        } else {
            merged.push(left[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    order.copy_from_slice(&merged);
    Ok(())
}
