//! Unary operator implementations.
//!
//! Direct enum-based dispatch over the fixed value set, like the binary
//! operators.

use tarn_ir::UnaryOp;

use crate::errors::{bad_operand_unary, EvalResult};
use crate::value::{DType, Value};

/// Evaluate `op value`.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> EvalResult {
    match (value, op) {
        (_, UnaryOp::Not) => Ok(Value::Bool(!value.is_truthy()?)),

        (Value::Int(i), UnaryOp::USub) => Ok(Value::Int(i.neg())),
        (Value::Float(f), UnaryOp::USub) => Ok(Value::Float(-f)),
        (Value::Bool(b), UnaryOp::USub) => Ok(Value::int(-i64::from(*b))),

        (Value::Int(_) | Value::Float(_), UnaryOp::UAdd) => Ok(value.clone()),
        (Value::Bool(b), UnaryOp::UAdd) => Ok(Value::int(i64::from(*b))),

        (Value::Int(i), UnaryOp::Invert) => Ok(Value::Int(i.invert())),
        (Value::Bool(b), UnaryOp::Invert) => Ok(Value::int(!i64::from(*b))),

        (Value::Array(a), UnaryOp::USub) => Ok(Value::array(a.borrow().map(|x| -x))),
        (Value::Array(a), UnaryOp::UAdd) => Ok(Value::array(a.borrow().map(|x| x))),
        (Value::Array(a), UnaryOp::Invert) if a.borrow().dtype() == DType::Bool => {
            let inverted = a.borrow().map(|x| f64::from(u8::from(x == 0.0)));
            Ok(Value::array(inverted.with_dtype(DType::Bool)))
        }

        _ => Err(bad_operand_unary(op.as_symbol(), value.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::NdArray;

    #[test]
    fn numeric_negation() {
        assert_eq!(evaluate_unary(&Value::int(5), UnaryOp::USub).ok(), Some(Value::int(-5)));
        assert_eq!(
            evaluate_unary(&Value::Float(1.5), UnaryOp::USub).ok(),
            Some(Value::Float(-1.5))
        );
        assert!(matches!(
            evaluate_unary(&Value::Bool(true), UnaryOp::USub),
            Ok(Value::Int(_))
        ));
    }

    #[test]
    fn not_uses_truthiness() {
        assert_eq!(evaluate_unary(&Value::from(""), UnaryOp::Not).ok(), Some(Value::Bool(true)));
        assert_eq!(
            evaluate_unary(&Value::list(vec![Value::None]), UnaryOp::Not).ok(),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn invert_is_integer_only() {
        assert_eq!(evaluate_unary(&Value::int(5), UnaryOp::Invert).ok(), Some(Value::int(-6)));
        let err = evaluate_unary(&Value::Float(1.0), UnaryOp::Invert);
        assert!(matches!(err, Err(e) if e.message == "bad operand type for unary ~: 'float'"));
    }

    #[test]
    fn arrays_negate_elementwise() {
        let a = Value::array(NdArray::from_vec(vec![1.0, -2.0]));
        let out = evaluate_unary(&a, UnaryOp::USub);
        assert_eq!(out.map(|v| v.to_string()).ok().as_deref(), Some("array([-1.0, 2.0])"));
    }
}
