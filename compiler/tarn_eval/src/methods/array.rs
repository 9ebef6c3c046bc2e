//! `ndarray` methods.

use crate::args::{arg_i64, CallArgs};
use crate::errors::{EvalError, EvalResult};
use crate::value::{NdArray, Shared, Value};

pub(super) const METHODS: &[&str] = &[
    "all", "any", "copy", "flatten", "max", "mean", "min", "reshape", "sum", "tolist", "transpose",
];

pub(super) fn call(array: &Shared<NdArray>, name: &str, args: &CallArgs) -> EvalResult {
    args.allow_keywords(name, &[])?;
    if name == "reshape" {
        let dims = shape_arg(name, &args.positional)?;
        return Ok(Value::array(array.borrow().reshape(&dims)?));
    }
    args.expect_count(name, 0, 0)?;
    let a = array.borrow();
    Ok(match name {
        "all" => Value::Bool(a.all()),
        "any" => Value::Bool(a.any()),
        "sum" => Value::Float(a.sum()),
        "mean" => Value::Float(a.mean()),
        "min" => Value::Float(a.min()?),
        "max" => Value::Float(a.max()?),
        "tolist" => a.to_list(),
        "transpose" => Value::array(a.transpose()),
        "flatten" => Value::array(a.reshape(&[-1])?),
        _ => Value::array(a.clone()),
    })
}

/// Shape given either as separate integers or as one sequence.
pub(crate) fn shape_arg(name: &str, values: &[Value]) -> Result<Vec<i64>, EvalError> {
    match values {
        [single @ (Value::Tuple(_) | Value::List(_))] => {
            single.iter()?.map(|d| arg_i64(name, &d)).collect()
        }
        dims => dims.iter().map(|d| arg_i64(name, d)).collect(),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn matrix() -> Shared<NdArray> {
        let data = (0..6).map(f64::from).collect();
        Rc::new(RefCell::new(NdArray::new(vec![2, 3], data, crate::value::DType::Float)))
    }

    #[test]
    fn reshape_accepts_tuple_or_ints() {
        let a = matrix();
        let by_tuple = Value::tuple(vec![Value::int(3), Value::int(-1)]);
        let Value::Array(r) = call(&a, "reshape", &CallArgs::new(vec![by_tuple])).unwrap() else {
            panic!("expected array");
        };
        assert_eq!(r.borrow().shape(), &[3, 2]);
        let Value::Array(r) =
            call(&a, "reshape", &CallArgs::new(vec![Value::int(6)])).unwrap()
        else {
            panic!("expected array");
        };
        assert_eq!(r.borrow().shape(), &[6]);
    }

    #[test]
    fn reductions() {
        let a = matrix();
        assert_eq!(call(&a, "sum", &CallArgs::default()).unwrap(), Value::Float(15.0));
        assert_eq!(call(&a, "max", &CallArgs::default()).unwrap(), Value::Float(5.0));
        assert_eq!(call(&a, "all", &CallArgs::default()).unwrap(), Value::Bool(false));
    }
}
