//! Calls: argument evaluation and dispatch by callee kind.

use std::rc::Rc;

use tarn_ir::{Expr, Keyword};

use super::{Flow, Interpreter};
use crate::args::CallArgs;
use crate::errors::{
    call_failed, foreign_procedure, not_callable, stray_signal, type_error, ErrorKind, EvalResult,
    Frame,
};
use crate::methods;
use crate::procedure::Procedure;
use crate::value::repr::repr;
use crate::value::{ExceptionValue, Value};

impl Interpreter {
    pub(super) fn eval_call(
        &mut self,
        func: &Expr,
        args: &[Expr],
        keywords: &[Keyword],
        starargs: Option<&Expr>,
        kwargs: Option<&Expr>,
    ) -> EvalResult {
        let callee = self.eval_expr(func)?;
        let mut positional = self.eval_all(args)?;
        if let Some(star) = starargs {
            positional.extend(self.eval_expr(star)?.iter()?);
        }
        let mut call_args = CallArgs::new(positional);
        for keyword in keywords {
            let value = self.eval_expr(&keyword.value)?;
            call_args.keywords.push((keyword.arg.clone(), value));
        }
        if let Some(kwargs) = kwargs {
            let Value::Dict(mapping) = self.eval_expr(kwargs)? else {
                return Err(type_error("argument after ** must be a mapping"));
            };
            for (key, value) in mapping.borrow().iter() {
                let Value::Str(name) = key else {
                    return Err(type_error("keywords must be strings"));
                };
                call_args.keywords.push((name.clone(), value.clone()));
            }
        }

        let shown = self.tracer.is_enabled().then(|| render_args(&call_args));
        let result = match self.call_value(&callee, call_args) {
            Ok(result) => result,
            Err(err) => {
                if let Some(shown) = &shown {
                    self.tracer.record(func.loc.line, || {
                        format!(
                            "Function `{}({shown})` raised on exception `{}`.",
                            callee_name(&callee),
                            err.message
                        )
                    });
                }
                return Err(err);
            }
        };
        if let Some(shown) = shown {
            self.tracer.record(func.loc.line, || {
                format!(
                    "Function `{}({shown})` returned `{}`.",
                    callee_name(&callee),
                    repr(&result)
                )
            });
        }
        Ok(result)
    }

    /// Call any callable value with already evaluated arguments.
    pub fn call_value(&mut self, callee: &Value, args: CallArgs) -> EvalResult {
        let native = match callee {
            Value::Procedure(p) => return self.call_procedure(p, args),
            Value::Builtin(b) => (b.func)(self, args),
            Value::HostFn(h) => h.call(&args),
            Value::BoundMethod(m) => {
                let receiver = m.receiver.clone();
                methods::call_method(self, &receiver, m.name, args)
            }
            Value::ExcType(t) => args
                .allow_keywords(t.name(), &[])
                .map(|()| Value::Exception(Rc::new(ExceptionValue::new(*t, args.positional)))),
            other => return Err(not_callable(&repr(other))),
        };
        native.map_err(|err| {
            let passthrough = matches!(err.kind, ErrorKind::Resource | ErrorKind::Arity)
                || err.payload.is_some()
                || !err.frames.is_empty();
            if passthrough {
                err
            } else {
                call_failed(&callee_name(callee), err)
            }
        })
    }

    #[tracing::instrument(level = "debug", skip_all, fields(name = %procedure.name))]
    fn call_procedure(&mut self, procedure: &Rc<Procedure>, args: CallArgs) -> EvalResult {
        if procedure.owner != self.id {
            return Err(foreign_procedure(&procedure.name));
        }
        let bound = procedure.bind_arguments(args)?;
        let outcome = {
            let mut frame = self.enter_procedure()?;
            for (name, value) in bound {
                frame.namespace.insert(name, value);
            }
            frame.exec_block(procedure.body())
        };
        match outcome {
            Ok(Flow::Return(value)) => Ok(value),
            Ok(Flow::Normal(_)) => Ok(Value::None),
            Ok(Flow::Break) => Err(stray_signal("break")),
            Ok(Flow::Continue) => Err(stray_signal("continue")),
            Err(mut err) => {
                err.frames.push(Frame {
                    name: procedure.name.clone(),
                    line: procedure.line,
                });
                Err(err)
            }
        }
    }
}

fn callee_name(callee: &Value) -> String {
    match callee {
        Value::Procedure(p) => p.name.to_string(),
        Value::Builtin(b) => b.name.to_string(),
        Value::HostFn(h) => h.name.to_string(),
        Value::BoundMethod(m) => m.name.to_string(),
        Value::ExcType(t) => t.name().to_string(),
        other => repr(other),
    }
}

fn render_args(args: &CallArgs) -> String {
    args.positional
        .iter()
        .map(repr)
        .chain(args.keywords.iter().map(|(k, v)| format!("{k}={}", repr(v))))
        .collect::<Vec<_>>()
        .join(", ")
}
