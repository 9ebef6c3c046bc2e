//! Assignment, unpacking, and deletion targets.

use tarn_ir::{Expr, ExprKind};

use super::access::{del_item, set_item};
use super::Interpreter;
use crate::errors::{
    cannot_assign_attribute, cannot_delete_attribute, syntax_error, type_error, unpack_not_enough,
    unpack_too_many, unsupported, EvalError,
};
use crate::value::repr::repr;
use crate::value::Value;

impl Interpreter {
    /// Bind `value` to an assignment target.
    pub fn assign(&mut self, target: &Expr, value: Value) -> Result<(), EvalError> {
        let line = target.loc.line;
        let result = match &target.kind {
            ExprKind::Name { id, .. } => {
                self.tracer
                    .record(line, || format!("Assigned value of {} to `{id}`.", repr(&value)));
                self.namespace.define(id.clone(), value)
            }
            ExprKind::Attribute { attr, .. } => Err(cannot_assign_attribute(attr)),
            ExprKind::Subscript { value: container, slice, .. } => {
                let container = self.eval_expr(container)?;
                let index = self.eval_slice(slice)?;
                set_item(&container, &index, value)
            }
            ExprKind::Tuple { elts, .. } | ExprKind::List { elts, .. } => self.unpack(elts, value),
            ExprKind::Starred(_) => Err(unsupported("Starred")),
            _ => Err(syntax_error(
                format!("cannot assign to {}", target.tag()),
                Some(target.loc),
            )),
        };
        result.map_err(|e| e.at(target.loc))
    }

    /// Unpack an iterable into exactly `targets.len()` targets.
    fn unpack(&mut self, targets: &[Expr], value: Value) -> Result<(), EvalError> {
        let Ok(iter) = value.iter() else {
            return Err(type_error(format!(
                "cannot unpack non-iterable {} object",
                value.type_name()
            )));
        };
        let expected = targets.len();
        let items: Vec<Value> = iter.take(expected + 1).collect();
        if items.len() > expected {
            let got = value.len().unwrap_or(items.len());
            return Err(unpack_too_many(expected, got));
        }
        if items.len() < expected {
            return Err(unpack_not_enough(expected, items.len()));
        }
        for (target, item) in targets.iter().zip(items) {
            self.assign(target, item)?;
        }
        Ok(())
    }

    /// `del target`.
    pub fn delete(&mut self, target: &Expr) -> Result<(), EvalError> {
        let result = match &target.kind {
            ExprKind::Name { id, .. } => self.namespace.remove(id).map(drop),
            ExprKind::Attribute { attr, .. } => Err(cannot_delete_attribute(attr)),
            ExprKind::Subscript { value: container, slice, .. } => {
                let container = self.eval_expr(container)?;
                let index = self.eval_slice(slice)?;
                del_item(&container, &index)
            }
            ExprKind::Tuple { elts, .. } | ExprKind::List { elts, .. } => {
                elts.iter().try_for_each(|e| self.delete(e))
            }
            _ => Err(syntax_error(
                format!("cannot delete {}", target.tag()),
                Some(target.loc),
            )),
        };
        result.map_err(|e| e.at(target.loc))
    }
}
