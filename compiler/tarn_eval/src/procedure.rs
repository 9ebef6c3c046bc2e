//! User-defined procedures and argument binding.
//!
//! A `Procedure` is what `def` evaluates to. It has no namespace of its
//! own: when called, its parameters are overlaid onto the interpreter's
//! namespace and the previous bindings are restored afterwards. Default
//! values are evaluated once, when the `def` runs.

use std::rc::Rc;

use tarn_ir::{FunctionDef, Ident, Stmt};

use crate::args::CallArgs;
use crate::errors::{
    duplicate_argument, extra_keywords, not_enough_arguments, too_many_arguments, EvalError,
};
use crate::interpreter::InstanceId;
use crate::value::{repr::repr, Dict, Value};

pub struct Procedure {
    pub name: Ident,
    /// Required parameters, in order.
    pub params: Vec<Ident>,
    /// Optional parameters with their definition-time defaults.
    pub defaults: Vec<(Ident, Value)>,
    pub vararg: Option<Ident>,
    pub varkw: Option<Ident>,
    pub line: u32,
    pub doc: Option<Rc<str>>,
    /// Interpreter instance that created the procedure.
    pub owner: InstanceId,
    def: Rc<FunctionDef>,
}

impl Procedure {
    /// `defaults` must align with the trailing parameters of `def`.
    pub fn new(def: Rc<FunctionDef>, defaults: Vec<Value>, owner: InstanceId) -> Self {
        let nreq = def.args.args.len().saturating_sub(defaults.len());
        let params = def.args.args[..nreq].to_vec();
        let defaults = def.args.args[nreq..]
            .iter()
            .cloned()
            .zip(defaults)
            .collect();
        Procedure {
            name: def.name.clone(),
            params,
            defaults,
            vararg: def.args.vararg.clone(),
            varkw: def.args.kwarg.clone(),
            line: def.loc.line,
            doc: def.docstring().map(Rc::from),
            owner,
            def,
        }
    }

    pub fn body(&self) -> &[Stmt] {
        &self.def.body
    }

    /// Call signature, e.g. `f(a, b=2, *args, **kws)`.
    pub fn signature(&self) -> String {
        let mut parts: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        for (name, default) in &self.defaults {
            parts.push(format!("{name}={}", repr(default)));
        }
        if let Some(vararg) = &self.vararg {
            parts.push(format!("*{vararg}"));
        }
        if let Some(varkw) = &self.varkw {
            parts.push(format!("**{varkw}"));
        }
        format!("{}({})", self.name, parts.join(", "))
    }

    /// Match call arguments to parameters.
    ///
    /// Keywords first fill missing required parameters in order, stopping
    /// at the first one not supplied. Positionals bind only the required
    /// parameters; any surplus goes to `*vararg` or is an arity failure.
    /// Optional parameters take their keyword when one is given and their
    /// default otherwise. Remaining keywords go to `**varkw`.
    pub fn bind_arguments(&self, args: CallArgs) -> Result<Vec<(Ident, Value)>, EvalError> {
        let CallArgs {
            mut positional,
            mut keywords,
        } = args;
        let nreq = self.params.len();

        if positional.len() < nreq && !keywords.is_empty() {
            for name in &self.params[positional.len()..] {
                match take_keyword(&mut keywords, name) {
                    Some(value) => positional.push(value),
                    None => break,
                }
            }
        }

        for name in &self.params[..positional.len().min(nreq)] {
            if keywords.iter().any(|(k, _)| k == name) {
                return Err(duplicate_argument(name, &self.name));
            }
        }

        if positional.len() < nreq {
            return Err(not_enough_arguments(&self.name, nreq, positional.len()));
        }
        if positional.len() > nreq && self.vararg.is_none() {
            return Err(too_many_arguments(&self.name, nreq, positional.len()));
        }

        let mut bound = Vec::with_capacity(nreq + self.defaults.len() + 2);
        let mut rest = positional.into_iter();
        for (name, value) in self.params.iter().zip(rest.by_ref()) {
            bound.push((name.clone(), value));
        }
        if let Some(vararg) = &self.vararg {
            bound.push((vararg.clone(), Value::tuple(rest.collect())));
        }
        for (name, default) in &self.defaults {
            let value = take_keyword(&mut keywords, name).unwrap_or_else(|| default.clone());
            bound.push((name.clone(), value));
        }
        match &self.varkw {
            Some(varkw) => {
                let mut dict = Dict::new();
                for (name, value) in keywords {
                    dict.insert(Value::Str(name), value)?;
                }
                bound.push((varkw.clone(), Value::dict(dict)));
            }
            None if !keywords.is_empty() => {
                let names: Vec<Ident> = keywords.into_iter().map(|(name, _)| name).collect();
                return Err(extra_keywords(&self.name, &names));
            }
            None => {}
        }
        Ok(bound)
    }
}

fn take_keyword(keywords: &mut Vec<(Ident, Value)>, name: &str) -> Option<Value> {
    let pos = keywords.iter().position(|(k, _)| &**k == name)?;
    Some(keywords.remove(pos).1)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tarn_ir::{Arguments, Location};

    fn procedure(args: &[&str], ndefaults: usize, vararg: bool, varkw: bool) -> Procedure {
        let def = FunctionDef {
            name: Rc::from("f"),
            args: Arguments {
                args: args.iter().map(|a| Rc::from(*a)).collect(),
                defaults: Vec::new(),
                vararg: vararg.then(|| Rc::from("rest")),
                kwarg: varkw.then(|| Rc::from("kws")),
            },
            body: Vec::new(),
            decorators: Vec::new(),
            loc: Location::new(1, 0),
        };
        let defaults = (0..ndefaults).map(|i| Value::int(100 + i as i64)).collect();
        Procedure::new(Rc::new(def), defaults, InstanceId::next())
    }

    fn names(bound: &[(Ident, Value)]) -> Vec<String> {
        bound.iter().map(|(n, v)| format!("{n}={v:?}")).collect()
    }

    #[test]
    fn signature_lists_every_parameter_kind() {
        let p = procedure(&["a", "b"], 1, true, true);
        assert_eq!(p.signature(), "f(a, b=100, *rest, **kws)");
    }

    #[test]
    fn optional_parameters_bind_from_keywords_or_defaults() {
        let p = procedure(&["a", "b", "c"], 2, false, false);
        let bound = p.bind_arguments(CallArgs::new(vec![Value::int(1)])).unwrap();
        assert_eq!(names(&bound), ["a=1", "b=100", "c=101"]);
        let args = CallArgs::new(vec![Value::int(1)]).with_keyword("c", Value::int(3));
        let bound = p.bind_arguments(args).unwrap();
        assert_eq!(names(&bound), ["a=1", "b=100", "c=3"]);
    }

    #[test]
    fn surplus_positionals_never_fill_optionals() {
        let p = procedure(&["a", "b"], 1, false, false);
        let err = p.bind_arguments(CallArgs::new(vec![Value::int(1), Value::int(5)]));
        assert_eq!(
            err.err().map(|e| e.message),
            Some("too many arguments for Procedure `f()` (expected 1, got 2)".to_string())
        );
        let p = procedure(&["a", "b"], 1, true, false);
        let bound = p.bind_arguments(CallArgs::new(vec![Value::int(1), Value::int(5)])).unwrap();
        assert_eq!(names(&bound), ["a=1", "rest=(5,)", "b=100"]);
    }

    #[test]
    fn keywords_fill_required_and_optional() {
        let p = procedure(&["a", "b", "c"], 1, false, false);
        let args = CallArgs::new(Vec::new())
            .with_keyword("c", Value::int(3))
            .with_keyword("b", Value::int(2))
            .with_keyword("a", Value::int(1));
        let bound = p.bind_arguments(args).unwrap();
        assert_eq!(names(&bound), ["a=1", "b=2", "c=3"]);
    }

    #[test]
    fn arity_failures() {
        let p = procedure(&["a", "b"], 0, false, false);
        let err = p.bind_arguments(CallArgs::new(vec![Value::int(1)]));
        assert_eq!(
            err.err().map(|e| e.message),
            Some("not enough arguments for Procedure `f()` (expected 2, got 1)".to_string())
        );
        let err = p.bind_arguments(CallArgs::new(vec![Value::int(1), Value::int(2), Value::int(3)]));
        assert_eq!(
            err.err().map(|e| e.message),
            Some("too many arguments for Procedure `f()` (expected 2, got 3)".to_string())
        );
    }

    #[test]
    fn duplicate_and_extra_keywords() {
        let p = procedure(&["a"], 0, false, false);
        let dup = p.bind_arguments(CallArgs::new(vec![Value::int(1)]).with_keyword("a", Value::int(2)));
        assert_eq!(
            dup.err().map(|e| e.message),
            Some("multiple values for keyword argument `a` in Procedure `f`".to_string())
        );
        let extra = p.bind_arguments(CallArgs::new(vec![Value::int(1)]).with_keyword("z", Value::int(2)));
        assert_eq!(
            extra.err().map(|e| e.message),
            Some("extra keyword arguments for Procedure `f` (`z`)".to_string())
        );
    }

    #[test]
    fn varargs_and_varkw_collect_the_rest() {
        let p = procedure(&["a"], 0, true, true);
        let args = CallArgs::new(vec![Value::int(1), Value::int(2), Value::int(3)])
            .with_keyword("z", Value::int(9));
        let bound = p.bind_arguments(args).unwrap();
        assert_eq!(names(&bound), ["a=1", "rest=(2, 3)", "kws={'z': 9}"]);
    }
}
