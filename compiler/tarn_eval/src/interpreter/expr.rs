//! Expression dispatch.

use tarn_ir::{BoolOp, CmpOp, Comprehension, Constant, Expr, ExprKind};

use super::Interpreter;
use crate::compare::evaluate_compare;
use crate::errors::{unsupported, EvalError, EvalResult};
use crate::operators::evaluate_binary;
use crate::unary_operators::evaluate_unary;
use crate::value::repr::repr;
use crate::value::{Dict, Int, Value};

impl Interpreter {
    /// Evaluate one expression node.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        tarn_stack::ensure_sufficient_stack(|| {
            self.governor.step().map_err(|e| e.at(expr.loc))?;
            self.eval_expr_kind(expr).map_err(|e| e.at(expr.loc))
        })
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> EvalResult {
        let line = expr.loc.line;
        match &expr.kind {
            ExprKind::Constant(c) => Ok(constant_value(c)),
            ExprKind::Name { id, .. } => {
                let value = self.namespace.lookup(id)?;
                self.tracer
                    .record(line, || format!("Value of `{id}` is `{}`.", repr(&value)));
                Ok(value)
            }
            ExprKind::List { elts, .. } => Ok(Value::list(self.eval_all(elts)?)),
            ExprKind::Tuple { elts, .. } => Ok(Value::tuple(self.eval_all(elts)?)),
            ExprKind::Dict { keys, values } => {
                let mut dict = Dict::new();
                for (key, value) in keys.iter().zip(values) {
                    let key = self.eval_expr(key)?;
                    let value = self.eval_expr(value)?;
                    dict.insert(key, value)?;
                }
                Ok(Value::dict(dict))
            }
            ExprKind::UnaryOp { op, operand } => {
                let value = self.eval_expr(operand)?;
                let result = evaluate_unary(&value, *op)?;
                self.tracer.record(line, || {
                    format!(
                        "Operation `{}{}` returned `{}`.",
                        op.as_symbol(),
                        repr(&value),
                        repr(&result)
                    )
                });
                Ok(result)
            }
            ExprKind::BinOp { left, op, right } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                let result = evaluate_binary(&l, &r, *op, self.governor.limits())?;
                self.tracer.record(line, || {
                    format!(
                        "Operation `{} {} {}` returned `{}`.",
                        repr(&l),
                        op.as_symbol(),
                        repr(&r),
                        repr(&result)
                    )
                });
                Ok(result)
            }
            ExprKind::BoolOp { op, values } => {
                let result = self.eval_bool_op(*op, values)?;
                self.tracer
                    .record(line, || format!("Boolean expression returned `{}`.", repr(&result)));
                Ok(result)
            }
            ExprKind::Compare {
                left,
                ops,
                comparators,
            } => self.eval_compare_chain(line, left, ops, comparators),
            ExprKind::IfExp { test, body, orelse } => {
                if self.eval_expr(test)?.is_truthy()? {
                    self.eval_expr(body)
                } else {
                    self.eval_expr(orelse)
                }
            }
            ExprKind::Attribute { value, attr, .. } => {
                let target = self.eval_expr(value)?;
                super::get_attribute(&target, attr)
            }
            ExprKind::Subscript { value, slice, .. } => {
                let target = self.eval_expr(value)?;
                let index = self.eval_slice(slice)?;
                super::get_item(&target, &index)
            }
            ExprKind::Call {
                func,
                args,
                keywords,
                starargs,
                kwargs,
            } => self.eval_call(func, args, keywords, starargs.as_deref(), kwargs.as_deref()),
            ExprKind::ListComp { elt, generators } => {
                let mut out = Vec::new();
                self.eval_comprehension(elt, generators, &mut out)?;
                Ok(Value::list(out))
            }
            ExprKind::Repr(inner) => {
                let value = self.eval_expr(inner)?;
                Ok(Value::from(repr(&value)))
            }
            ExprKind::Lambda { .. }
            | ExprKind::Yield(_)
            | ExprKind::GeneratorExp { .. }
            | ExprKind::Set(_)
            | ExprKind::SetComp { .. }
            | ExprKind::DictComp { .. }
            | ExprKind::Starred(_) => Err(unsupported(expr.tag())),
        }
    }

    pub(super) fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, EvalError> {
        exprs.iter().map(|e| self.eval_expr(e)).collect()
    }

    /// `and` / `or` return the deciding operand, not a bool.
    fn eval_bool_op(&mut self, op: BoolOp, values: &[Expr]) -> EvalResult {
        let mut last = Value::None;
        for expr in values {
            last = self.eval_expr(expr)?;
            let truthy = last.is_truthy()?;
            match op {
                BoolOp::And if !truthy => return Ok(last),
                BoolOp::Or if truthy => return Ok(last),
                _ => {}
            }
        }
        Ok(last)
    }

    /// `a < b < c` evaluates each operand once and stops at the first false
    /// link. An element-wise link stops the chain once any element is true.
    fn eval_compare_chain(
        &mut self,
        line: u32,
        left: &Expr,
        ops: &[CmpOp],
        comparators: &[Expr],
    ) -> EvalResult {
        let mut lhs = self.eval_expr(left)?;
        let mut result = Value::Bool(true);
        for (op, rhs_expr) in ops.iter().zip(comparators) {
            let rhs = self.eval_expr(rhs_expr)?;
            result = evaluate_compare(*op, &lhs, &rhs)?;
            self.tracer.record(line, || {
                format!(
                    "Comparison `{} {} {}` returned `{}`.",
                    repr(&lhs),
                    op.as_symbol(),
                    repr(&rhs),
                    repr(&result)
                )
            });
            let stop = match &result {
                Value::Array(a) => a.borrow().any(),
                scalar => !scalar.is_truthy()?,
            };
            if stop {
                break;
            }
            lhs = rhs;
        }
        Ok(result)
    }

    /// Nested generators: the first clause is the outermost loop. Targets
    /// are bound in the shared namespace and stay bound afterwards.
    fn eval_comprehension(
        &mut self,
        elt: &Expr,
        generators: &[Comprehension],
        out: &mut Vec<Value>,
    ) -> Result<(), EvalError> {
        let Some((first, rest)) = generators.split_first() else {
            out.push(self.eval_expr(elt)?);
            return Ok(());
        };
        let iterable = self.eval_expr(&first.iter)?;
        'items: for item in iterable.iter()? {
            self.assign(&first.target, item)?;
            for cond in &first.ifs {
                if !self.eval_expr(cond)?.is_truthy()? {
                    continue 'items;
                }
            }
            self.eval_comprehension(elt, rest, out)?;
        }
        Ok(())
    }
}

fn constant_value(constant: &Constant) -> Value {
    match constant {
        Constant::None => Value::None,
        Constant::Bool(b) => Value::Bool(*b),
        Constant::Int(i) => Value::Int(Int::from_bigint(i.clone())),
        Constant::Float(f) => Value::Float(*f),
        Constant::Str(s) => Value::Str(s.clone()),
        Constant::Ellipsis => Value::Ellipsis,
    }
}
