//! The sandbox gate: reserved names, denied attributes, unsupported syntax.

use pretty_assertions::assert_eq;

use super::{eval, fails};
use crate::errors::ErrorKind;
use crate::value::ExcType;
use crate::{Value, UNSAFE_ATTRS};

#[test]
fn syntax_failures() {
    for src in ["class = 1", "1x = 1", "x = (1/*)", "x = 1.A", "True = 2"] {
        let err = fails(src);
        assert_eq!(err.kind, ErrorKind::Syntax, "{src}");
        assert_eq!(err.exc, ExcType::SyntaxError, "{src}");
    }
}

#[test]
fn reserved_names_cannot_be_bound() {
    for src in ["eval = 2", "__import__ = 2", "print = 1", "for exec in [1]:\n    pass"] {
        let err = fails(src);
        assert_eq!(err.kind, ErrorKind::Name, "{src}");
    }
    assert_eq!(
        fails("eval = 2").message,
        "invalid symbol name (reserved word?) `eval`"
    );
}

#[test]
fn escape_hatches_are_absent() {
    for name in ["eval", "exec", "open", "__import__", "getattr", "globals", "vars"] {
        let err = fails(&format!("{name}('1')"));
        assert_eq!(err.kind, ErrorKind::Name, "{name}");
    }
}

#[test]
fn unsupported_constructs() {
    for (src, tag) in [
        ("f = lambda x: x*x", "Lambda"),
        ("yield 10", "Yield"),
        ("import os", "Import"),
        ("class C:\n    pass", "ClassDef"),
        ("{x: 1 for x in 'ab'}", "DictComp"),
    ] {
        let err = fails(src);
        assert_eq!(err.kind, ErrorKind::Unsupported, "{src}");
        assert_eq!(err.message, format!("`{tag}` not supported"), "{src}");
    }
}

#[test]
fn dunder_attributes_are_denied() {
    for attr in UNSAFE_ATTRS {
        let err = fails(&format!("(1).{attr}"));
        assert_eq!(err.exc, ExcType::AttributeError, "{attr}");
        assert!(err.message.starts_with("cannot access attribute"), "{attr}: {}", err.message);
    }
    let err = fails("def f():\n    pass\nf.__globals__");
    assert_eq!(err.message, "cannot access attribute `__globals__` for `<Procedure f()>`");
}

#[test]
fn class_walk_is_blocked() {
    let err = fails("().__class__.__bases__[0].__subclasses__()");
    assert_eq!(err.exc, ExcType::AttributeError);
}

#[test]
fn missing_attributes() {
    let err = fails("'abc'.nope");
    assert_eq!(err.kind, ErrorKind::Attribute);
    assert_eq!(err.message, "no attribute `nope` for `'abc'`");
    assert_eq!(fails("x = [1]\nx.attr = 3").exc, ExcType::AttributeError);
}

#[test]
fn safe_attributes_are_reachable() {
    assert_eq!(eval("(3).real + (2.5).imag"), Value::int(3));
    assert_eq!(eval("x = 'go'.upper\nx()"), Value::from("GO"));
    assert_eq!(eval("range(1, 9, 2).stop"), Value::int(9));
    assert_eq!(eval("len.__name__"), Value::from("len"));
}

#[test]
fn resource_failures_cannot_be_caught() {
    let src = "\
try:
    x = 10 ** 10001
except:
    x = 'caught'
x";
    let err = fails(src);
    assert_eq!(err.kind, ErrorKind::Resource);
}
