//! The seed namespace every interpreter starts from.
//!
//! `base` registers the core functions and type constructors and `math`
//! the math bindings. The array functions in `arrays` are bound only when
//! arrays are enabled. Nothing else is reachable from a script unless the
//! host adds it.

mod arrays;
mod base;
mod math;

use tarn_ir::Ident;

use crate::namespace::Namespace;
use crate::value::{Builtin, BuiltinFn, ExcType, Value};

/// Build the initial namespace.
pub fn seed(use_arrays: bool) -> Namespace {
    let mut namespace = Namespace::new();
    for exc in ExcType::ALL {
        namespace.insert(Ident::from(exc.name()), Value::ExcType(*exc));
    }
    namespace.insert(Ident::from("True"), Value::Bool(true));
    namespace.insert(Ident::from("False"), Value::Bool(false));
    namespace.insert(Ident::from("None"), Value::None);
    base::register(&mut namespace);
    math::register(&mut namespace);
    if use_arrays {
        arrays::register(&mut namespace);
    }
    tracing::trace!(names = namespace.len(), use_arrays, "seed namespace built");
    namespace
}

fn bind(namespace: &mut Namespace, name: &'static str, func: BuiltinFn) {
    namespace.insert(
        Ident::from(name),
        Value::Builtin(Builtin {
            name,
            func,
            is_type: false,
        }),
    );
}

fn bind_type(namespace: &mut Namespace, name: &'static str, func: BuiltinFn) {
    namespace.insert(
        Ident::from(name),
        Value::Builtin(Builtin {
            name,
            func,
            is_type: true,
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_are_opt_in() {
        assert!(!seed(false).contains("zeros"));
        assert!(seed(true).contains("zeros"));
    }

    #[test]
    fn seed_has_no_escape_hatches() {
        let namespace = seed(true);
        for name in ["eval", "exec", "open", "__import__", "getattr", "globals", "compile"] {
            assert!(!namespace.contains(name), "{name} must not be seeded");
        }
    }

    #[test]
    fn exception_types_and_constants_are_bound() {
        let namespace = seed(false);
        assert!(matches!(namespace.get("ValueError"), Some(Value::ExcType(ExcType::ValueError))));
        assert!(matches!(namespace.get("True"), Some(Value::Bool(true))));
        assert!(matches!(namespace.get("pi"), Some(Value::Float(_))));
    }
}
