//! `def`, argument binding, and the namespace overlay.

use pretty_assertions::assert_eq;

use super::{eval, fails};
use crate::errors::ErrorKind;
use crate::value::ExcType;
use crate::Value;

#[test]
fn defaults_keywords_and_varargs() {
    let src = "\
def f(a, b=2, *rest, **opts):
    return [a, b, list(rest), sorted(opts.items())]
[f(1), f(1, 3, 4, 5), f(a=7, b=8, c=9), f(1, 4, b=3)]";
    assert_eq!(
        eval(src),
        eval("[[1, 2, [], []], [1, 2, [3, 4, 5], []], [7, 8, [], [('c', 9)]], [1, 3, [4], []]]")
    );
}

#[test]
fn optional_parameters_are_keyword_only_in_practice() {
    let err = fails("def f(a, b=2):\n    return b\nf(1, 5)");
    assert_eq!(err.kind, ErrorKind::Arity);
    assert_eq!(
        err.message,
        "too many arguments for Procedure `f()` (expected 1, got 2)"
    );
    assert_eq!(eval("def f(a, b=2):\n    return b\nf(1, b=5)"), Value::int(5));
    assert_eq!(
        eval("def f(a, b=2, *r):\n    return (b, r)\nf(1, 5)"),
        eval("(2, (5,))")
    );
}

#[test]
fn call_site_splatting() {
    let src = "\
def f(a, b, c):
    return a * 100 + b * 10 + c
args = [1, 2]
kw = {'c': 3}
f(*args, **kw)";
    assert_eq!(eval(src), Value::int(123));
}

#[test]
fn defaults_are_evaluated_once() {
    let src = "\
def f(item, acc=[]):
    acc.append(item)
    return len(acc)
f(1)
f(2)";
    assert_eq!(eval(src), Value::int(2));
}

#[test]
fn arity_failures() {
    let src = "def f(a, b):\n    return a\n";
    let err = fails(&format!("{src}f(1)"));
    assert_eq!(err.kind, ErrorKind::Arity);
    assert_eq!(
        err.message,
        "not enough arguments for Procedure `f()` (expected 2, got 1)"
    );
    let err = fails(&format!("{src}f(1, 2, 3)"));
    assert_eq!(
        err.message,
        "too many arguments for Procedure `f()` (expected 2, got 3)"
    );
    let err = fails(&format!("{src}f(1, 2, z=3)"));
    assert_eq!(err.message, "extra keyword arguments for Procedure `f` (`z`)");
    let err = fails(&format!("{src}f(1, a=1)"));
    assert_eq!(
        err.message,
        "multiple values for keyword argument `a` in Procedure `f`"
    );
}

#[test]
fn calls_overlay_and_restore_the_namespace() {
    let src = "\
x = 'outer'
def f(x):
    y = 'inner'
    return x
r = f('param')
[r, x]";
    assert_eq!(eval(src), eval("['param', 'outer']"));
    assert_eq!(fails("def f():\n    y = 1\nf()\ny").exc, ExcType::NameError);
}

#[test]
fn procedures_see_caller_bindings() {
    let src = "\
scale = 3
def f(n):
    return n * scale
f(5)";
    assert_eq!(eval(src), Value::int(15));
}

#[test]
fn container_mutation_survives_the_call() {
    let src = "\
data = []
def fill(n):
    for i in range(n):
        data.append(i)
fill(3)
data";
    assert_eq!(eval(src), eval("[0, 1, 2]"));
}

#[test]
fn recursion_works_within_the_depth_limit() {
    let src = "\
def fib(n):
    if n < 2:
        return n
    return fib(n - 1) + fib(n - 2)
fib(15)";
    assert_eq!(eval(src), Value::int(610));
}

#[test]
fn implicit_return_is_none() {
    assert_eq!(eval("def f():\n    pass\nf()"), Value::None);
}

#[test]
fn docstrings_and_names() {
    let src = "\
def area(r):
    'Area of a circle.'
    return pi * r * r
[area.__name__, area.__doc__]";
    assert_eq!(eval(src), eval("['area', 'Area of a circle.']"));
}

#[test]
fn non_callables_are_rejected() {
    let err = fails("x = 3\nx()");
    assert_eq!(err.exc, ExcType::TypeError);
    assert_eq!(err.message, "`3` is not callable");
}

#[test]
fn builtin_failures_keep_their_class() {
    let err = fails("int('nope')");
    assert_eq!(err.exc, ExcType::ValueError);
    assert!(err.message.starts_with("Error calling `int()`"), "{}", err.message);
}
