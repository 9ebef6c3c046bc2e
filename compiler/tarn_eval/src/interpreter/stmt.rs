//! Statement dispatch and control flow.

use std::rc::Rc;

use tarn_ir::{ExceptHandler, Expr, FunctionDef, Stmt, StmtKind};

use super::{Flow, Interpreter};
use crate::errors::{
    assertion_failed, no_active_exception, type_error, unsupported, EvalError,
};
use crate::operators::evaluate_binary;
use crate::procedure::Procedure;
use crate::value::repr::{repr, to_str};
use crate::value::{ExceptionValue, Value};

type FlowResult = Result<Flow, EvalError>;

impl Interpreter {
    /// Execute one statement node.
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> FlowResult {
        tarn_stack::ensure_sufficient_stack(|| {
            self.governor.step().map_err(|e| e.at(stmt.loc))?;
            self.exec_stmt_kind(stmt).map_err(|e| e.at(stmt.loc))
        })
    }

    /// Run statements in order, stopping at the first signal.
    pub fn exec_block(&mut self, body: &[Stmt]) -> FlowResult {
        let mut last = Flow::Normal(Value::None);
        for stmt in body {
            last = self.exec_stmt(stmt)?;
            if !last.is_normal() {
                return Ok(last);
            }
        }
        Ok(last)
    }

    fn exec_stmt_kind(&mut self, stmt: &Stmt) -> FlowResult {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                let value = self.eval_expr(expr)?;
                self.tracer
                    .record(stmt.loc.line, || format!("Expression returned `{}`.", repr(&value)));
                Ok(Flow::Normal(value))
            }
            StmtKind::Assign { targets, value } => {
                let value = self.eval_expr(value)?;
                for target in targets {
                    self.assign(target, value.clone())?;
                }
                Ok(Flow::Normal(Value::None))
            }
            StmtKind::AugAssign { target, op, value } => {
                let current = self.eval_expr(target)?;
                let rhs = self.eval_expr(value)?;
                let result = evaluate_binary(&current, &rhs, *op, self.governor.limits())?;
                self.assign(target, result)?;
                Ok(Flow::Normal(Value::None))
            }
            StmtKind::If { test, body, orelse } => {
                if self.eval_expr(test)?.is_truthy()? {
                    self.exec_block(body)
                } else {
                    self.exec_block(orelse)
                }
            }
            StmtKind::While { test, body, orelse } => self.exec_while(test, body, orelse),
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            } => self.exec_for(target, iter, body, orelse),
            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => self.exec_try(body, handlers, orelse, finalbody),
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::None,
                };
                self.tracer
                    .record(stmt.loc.line, || format!("Returning `{}`.", repr(&value)));
                Ok(Flow::Return(value))
            }
            StmtKind::Assert { test, msg } => {
                if self.eval_expr(test)?.is_truthy()? {
                    return Ok(Flow::Normal(Value::None));
                }
                let message = match msg {
                    Some(msg) => to_str(&self.eval_expr(msg)?),
                    None => String::new(),
                };
                Err(assertion_failed(message))
            }
            StmtKind::Delete(targets) => {
                for target in targets {
                    self.delete(target)?;
                }
                Ok(Flow::Normal(Value::None))
            }
            StmtKind::Pass => Ok(Flow::Normal(Value::None)),
            StmtKind::FunctionDef(def) => {
                self.define_procedure(def)?;
                Ok(Flow::Normal(Value::None))
            }
            StmtKind::Print { values, newline } => {
                let values = self.eval_all(values)?;
                let text = values.iter().map(to_str).collect::<Vec<_>>().join(" ");
                if *newline {
                    self.writer.println(&text);
                } else {
                    self.writer.write(&text);
                }
                Ok(Flow::Normal(Value::None))
            }
            StmtKind::Raise { exc, cause } => Err(self.build_raise(exc.as_ref(), cause.as_ref())?),
            StmtKind::ClassDef { .. }
            | StmtKind::Import { .. }
            | StmtKind::ImportFrom { .. }
            | StmtKind::Global(_)
            | StmtKind::Nonlocal(_)
            | StmtKind::With { .. } => Err(unsupported(stmt.tag())),
        }
    }

    fn exec_while(&mut self, test: &Expr, body: &[Stmt], orelse: &[Stmt]) -> FlowResult {
        while self.eval_expr(test)?.is_truthy()? {
            match self.exec_block(body)? {
                Flow::Break => return Ok(Flow::Normal(Value::None)),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal(_) | Flow::Continue => {}
            }
        }
        self.exec_block(orelse)
    }

    fn exec_for(&mut self, target: &Expr, iter: &Expr, body: &[Stmt], orelse: &[Stmt]) -> FlowResult {
        let iterable = self.eval_expr(iter)?;
        for item in iterable.iter()? {
            self.assign(target, item)?;
            match self.exec_block(body)? {
                Flow::Break => return Ok(Flow::Normal(Value::None)),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal(_) | Flow::Continue => {}
            }
        }
        self.exec_block(orelse)
    }

    /// `try` / `except` / `else` / `finally`.
    ///
    /// Resource failures pass straight through, skipping handlers and
    /// `finally`. A signal or failure out of `finally` replaces whatever
    /// was pending.
    fn exec_try(
        &mut self,
        body: &[Stmt],
        handlers: &[ExceptHandler],
        orelse: &[Stmt],
        finalbody: &[Stmt],
    ) -> FlowResult {
        let outcome = match self.exec_block(body) {
            Ok(flow) if flow.is_normal() => {
                if let Some(first) = orelse.first() {
                    self.tracer.record(first.loc.line, || "Executing `else` block.".to_string());
                }
                self.exec_block(orelse)
            }
            Ok(flow) => Ok(flow),
            Err(err) if !err.is_catchable() || handlers.is_empty() => Err(err),
            Err(err) => self.run_handlers(handlers, err),
        };
        if matches!(&outcome, Err(err) if !err.is_catchable()) {
            return outcome;
        }
        let Some(first) = finalbody.first() else {
            return outcome;
        };
        self.tracer.record(first.loc.line, || "Executing `finally` block.".to_string());
        match self.exec_block(finalbody)? {
            Flow::Normal(_) => outcome,
            signal => Ok(signal),
        }
    }

    /// Every handler runs, in order, against the same failure.
    fn run_handlers(&mut self, handlers: &[ExceptHandler], err: EvalError) -> FlowResult {
        let exception = err.to_exception();
        let previous = self.last_error.replace(err);
        let mut outcome = Ok(Flow::Normal(Value::None));
        for handler in handlers {
            if let Some(name) = &handler.name {
                let bound = self
                    .namespace
                    .define(name.clone(), Value::Exception(exception.clone()));
                if let Err(e) = bound {
                    outcome = Err(e.at(handler.loc));
                    break;
                }
            }
            match self.exec_block(&handler.body) {
                Ok(Flow::Normal(_)) => {}
                other => {
                    outcome = other;
                    break;
                }
            }
        }
        self.last_error = previous;
        outcome
    }

    /// Build the failure a `raise` statement throws.
    fn build_raise(&mut self, exc: Option<&Expr>, cause: Option<&Expr>) -> Result<EvalError, EvalError> {
        let Some(exc) = exc else {
            return Ok(self.last_error.clone().unwrap_or_else(no_active_exception));
        };
        let mut err = match self.eval_expr(exc)? {
            Value::ExcType(t) => EvalError::from_exception(Rc::new(ExceptionValue::new(t, Vec::new()))),
            Value::Exception(e) => EvalError::from_exception(e),
            _ => return Err(type_error("exceptions must derive from BaseException")),
        };
        if let Some(cause) = cause {
            let cause = self.eval_expr(cause)?;
            err.message = format!("{}: {}", err.message, to_str(&cause));
        }
        Ok(err)
    }

    fn define_procedure(&mut self, def: &Rc<FunctionDef>) -> Result<(), EvalError> {
        if !def.decorators.is_empty() {
            return Err(unsupported("decorators"));
        }
        let defaults = self.eval_all(&def.args.defaults)?;
        let procedure = Procedure::new(def.clone(), defaults, self.id);
        self.namespace
            .define(def.name.clone(), Value::Procedure(Rc::new(procedure)))
    }
}
