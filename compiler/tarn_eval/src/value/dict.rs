//! Insertion-ordered dictionary.
//!
//! Entries live in a `Vec` in insertion order; an `FxHashMap` from a
//! hashable projection of the key to the entry position gives O(1) lookup.
//! Keys that compare equal across types (`1`, `1.0`, `True`) project to the
//! same `HashKey`, so they address the same entry.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::{Int, Value};
use crate::errors::{unhashable_type, EvalError};

/// Hashable projection of a key value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashKey {
    None,
    Ellipsis,
    Int(Int),
    Float(u64),
    Str(Rc<str>),
    Tuple(Vec<HashKey>),
    Range(i64, i64, i64),
    Named(&'static str),
    Identity(usize),
}

impl HashKey {
    pub fn from_value(value: &Value) -> Result<HashKey, EvalError> {
        Ok(match value {
            Value::None => HashKey::None,
            Value::Ellipsis => HashKey::Ellipsis,
            Value::Bool(b) => HashKey::Int(Int::from_i64(i64::from(*b))),
            Value::Int(i) => HashKey::Int(i.clone()),
            Value::Float(f) => match Int::from_f64(*f) {
                Some(i) if i.to_f64() == *f => HashKey::Int(i),
                _ => HashKey::Float(f.to_bits()),
            },
            Value::Str(s) => HashKey::Str(s.clone()),
            Value::Tuple(items) => HashKey::Tuple(
                items
                    .iter()
                    .map(HashKey::from_value)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Range(r) => HashKey::Range(r.start, r.stop, r.step),
            Value::ExcType(t) => HashKey::Named(t.name()),
            Value::Builtin(b) => HashKey::Named(b.name),
            Value::Procedure(p) => HashKey::Identity(Rc::as_ptr(p).cast::<()>() as usize),
            Value::Exception(e) => HashKey::Identity(Rc::as_ptr(e).cast::<()>() as usize),
            Value::HostFn(h) => HashKey::Identity(Rc::as_ptr(h).cast::<()>() as usize),
            Value::List(_)
            | Value::Dict(_)
            | Value::Slice(_)
            | Value::Array(_)
            | Value::BoundMethod(_) => return Err(unhashable_type(value.type_name())),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Dict {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<HashKey, usize>,
}

impl Dict {
    pub fn new() -> Self {
        Dict::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Result<Option<&Value>, EvalError> {
        let hk = HashKey::from_value(key)?;
        Ok(self.index.get(&hk).map(|&i| &self.entries[i].1))
    }

    pub fn contains_key(&self, key: &Value) -> Result<bool, EvalError> {
        Ok(self.index.contains_key(&HashKey::from_value(key)?))
    }

    /// Insert or overwrite. An existing key keeps its original position.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), EvalError> {
        let hk = HashKey::from_value(&key)?;
        if let Some(&i) = self.index.get(&hk) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(hk, self.entries.len());
            self.entries.push((key, value));
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>, EvalError> {
        let hk = HashKey::from_value(key)?;
        let Some(pos) = self.index.remove(&hk) else {
            return Ok(None);
        };
        let (_, value) = self.entries.remove(pos);
        self.reindex_from(pos);
        Ok(Some(value))
    }

    /// Remove and return the most recently inserted entry.
    pub fn pop_last(&mut self) -> Option<(Value, Value)> {
        let (key, value) = self.entries.pop()?;
        if let Ok(hk) = HashKey::from_value(&key) {
            self.index.remove(&hk);
        }
        Some((key, value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    fn reindex_from(&mut self, start: usize) {
        for (i, (key, _)) in self.entries.iter().enumerate().skip(start) {
            if let Ok(hk) = HashKey::from_value(key) {
                self.index.insert(hk, i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_keys_share_an_entry() {
        let mut d = Dict::new();
        d.insert(Value::int(1), Value::from("a")).unwrap_or_default();
        d.insert(Value::Float(1.0), Value::from("b")).unwrap_or_default();
        d.insert(Value::Bool(true), Value::from("c")).unwrap_or_default();
        assert_eq!(d.len(), 1);
        assert!(matches!(d.get(&Value::int(1)), Ok(Some(Value::Str(s))) if &**s == "c"));
    }

    #[test]
    fn removal_keeps_order_and_lookup() {
        let mut d = Dict::new();
        for (i, k) in ["a", "b", "c"].into_iter().enumerate() {
            d.insert(Value::from(k), Value::int(i as i64)).unwrap_or_default();
        }
        assert!(matches!(d.remove(&Value::from("a")), Ok(Some(_))));
        let keys: Vec<String> = d.keys().map(crate::value::repr::to_str).collect();
        assert_eq!(keys, vec!["b", "c"]);
        assert!(matches!(d.get(&Value::from("c")), Ok(Some(Value::Int(i))) if *i == Int::from_i64(2)));
    }

    #[test]
    fn lists_are_unhashable() {
        let mut d = Dict::new();
        let err = d.insert(Value::list(Vec::new()), Value::None);
        assert!(err.is_err());
    }
}
