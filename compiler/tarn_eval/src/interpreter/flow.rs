//! Control-flow outcome of executing a statement.

use crate::value::Value;

/// How a statement or block finished.
///
/// Failures travel separately as `Err(EvalError)`. `Return(Value::None)`
/// is an explicit `return`; a body that runs off its end is `Normal`.
#[derive(Clone, Debug)]
pub enum Flow {
    /// Completed; carries the value of an expression statement.
    Normal(Value),
    Break,
    Continue,
    Return(Value),
}

impl Flow {
    pub fn is_normal(&self) -> bool {
        matches!(self, Flow::Normal(_))
    }
}
