//! Arguments passed to a callable.

use std::rc::Rc;

use tarn_ir::Ident;

use crate::errors::{type_error, unexpected_keyword, wrong_arg_count, EvalError};
use crate::value::{Int, Value};

#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keywords: Vec<(Ident, Value)>,
}

impl CallArgs {
    pub fn new(positional: Vec<Value>) -> Self {
        CallArgs {
            positional,
            keywords: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_keyword(mut self, name: &str, value: Value) -> Self {
        self.keywords.push((Rc::from(name), value));
        self
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    /// Check the positional count is within `min..=max`.
    pub fn expect_count(&self, function: &str, min: usize, max: usize) -> Result<(), EvalError> {
        let got = self.positional.len();
        if (min..=max).contains(&got) {
            return Ok(());
        }
        let expected = match (min, max) {
            (a, b) if a == b && a == 1 => "exactly one argument".to_string(),
            (a, b) if a == b => format!("exactly {a} arguments"),
            (0, b) => format!("at most {b} arguments"),
            (a, usize::MAX) => format!("at least {a} arguments"),
            (a, b) => format!("from {a} to {b} arguments"),
        };
        Err(wrong_arg_count(function, &expected, got))
    }

    /// Fail if any keyword other than `allowed` was passed.
    pub fn allow_keywords(&self, function: &str, allowed: &[&str]) -> Result<(), EvalError> {
        match self
            .keywords
            .iter()
            .find(|(name, _)| !allowed.contains(&&**name))
        {
            Some((name, _)) => Err(unexpected_keyword(function, name)),
            None => Ok(()),
        }
    }

    /// Remove and return a keyword argument.
    pub fn take_keyword(&mut self, name: &str) -> Option<Value> {
        let pos = self.keywords.iter().position(|(k, _)| &**k == name)?;
        Some(self.keywords.remove(pos).1)
    }

    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }
}

// Argument coercions shared by native functions

pub fn arg_f64(function: &str, value: &Value) -> Result<f64, EvalError> {
    value.as_f64().ok_or_else(|| {
        type_error(format!(
            "{function}() argument must be a real number, not '{}'",
            value.type_name()
        ))
    })
}

pub fn arg_int(function: &str, value: &Value) -> Result<Int, EvalError> {
    value.as_int().ok_or_else(|| {
        type_error(format!(
            "'{}' object cannot be interpreted as an integer (in {function}())",
            value.type_name()
        ))
    })
}

/// Integer argument that must fit a machine word.
pub fn arg_i64(function: &str, value: &Value) -> Result<i64, EvalError> {
    arg_int(function, value)?.to_i64().ok_or_else(|| {
        crate::errors::overflow_error(format!(
            "{function}() argument too large to convert to a machine integer"
        ))
    })
}

pub fn arg_str<'a>(function: &str, value: &'a Value) -> Result<&'a str, EvalError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(type_error(format!(
            "{function}() argument must be str, not {}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_messages_name_the_function() {
        let args = CallArgs::new(vec![Value::int(1), Value::int(2)]);
        let err = args.expect_count("len", 1, 1);
        assert!(matches!(err, Err(e) if e.message == "len() takes exactly one argument (2 given)"));
        assert!(args.expect_count("max", 1, usize::MAX).is_ok());
    }

    #[test]
    fn unknown_keywords_are_rejected() {
        let args = CallArgs::new(Vec::new()).with_keyword("key", Value::None);
        assert!(args.allow_keywords("sorted", &["key", "reverse"]).is_ok());
        assert!(args.allow_keywords("len", &[]).is_err());
    }

    #[test]
    fn take_keyword_removes_it() {
        let mut args = CallArgs::new(Vec::new()).with_keyword("start", Value::int(1));
        assert!(args.take_keyword("start").is_some());
        assert!(args.keyword("start").is_none());
    }
}
