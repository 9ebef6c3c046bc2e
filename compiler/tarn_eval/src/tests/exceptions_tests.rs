//! `try`, `raise`, and the error trail.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::{eval, fails, output, quiet};
use crate::errors::ErrorKind;
use crate::value::ExcType;
use crate::Value;

#[test]
fn except_binds_the_exception() {
    let src = "\
try:
    x = 1 / 0
except ZeroDivisionError as e:
    caught = e
caught.args";
    let args = eval(src);
    let Value::Tuple(items) = args else {
        panic!("expected tuple, got {args:?}");
    };
    assert_eq!(items.len(), 1);
    assert!(matches!(&items[0], Value::Str(s) if s.contains("division by zero")));
}

#[test]
fn every_handler_runs_in_order() {
    let src = "\
log = []
try:
    1 / 0
except KeyError:
    log.append('key')
except ZeroDivisionError:
    log.append('zero')
log";
    assert_eq!(eval(src), eval("['key', 'zero']"));
}

#[test]
fn else_runs_only_on_success() {
    let src = "\
log = []
try:
    pass
except ValueError:
    log.append('handler')
else:
    log.append('else')
try:
    int('x')
except ValueError:
    log.append('caught')
else:
    log.append('not reached')
log";
    assert_eq!(eval(src), eval("['else', 'caught']"));
}

#[test]
fn finally_always_runs() {
    let src = "\
log = []
def f():
    try:
        return 'body'
    finally:
        log.append('finally')
r = f()
try:
    try:
        1 / 0
    finally:
        log.append('inner')
except ZeroDivisionError:
    log.append('outer')
[r, log]";
    assert_eq!(eval(src), eval("['body', ['finally', 'inner', 'outer']]"));
}

#[test]
fn try_without_handlers_reraises_after_finally() {
    let (mut interp, out) = quiet();
    let err = interp
        .eval("try:\n    undefined_name\nfinally:\n    print('cleanup')")
        .unwrap_err();
    assert_eq!(err.exc, ExcType::NameError);
    assert_eq!(out.get_output(), "cleanup\n");
}

#[test]
fn finally_signal_replaces_pending_failure() {
    let src = "\
def f():
    try:
        1 / 0
    finally:
        return 'swallowed'
f()";
    assert_eq!(eval(src), Value::from("swallowed"));
}

#[test]
fn raise_forms() {
    let err = fails("raise ValueError('bad value')");
    assert_eq!(err.exc, ExcType::ValueError);
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert_eq!(err.message, "bad value");

    let err = fails("raise KeyError");
    assert_eq!(err.exc, ExcType::KeyError);

    let err = fails("raise RuntimeError('outer') from ValueError('inner')");
    assert!(err.message.starts_with("outer: "), "{}", err.message);

    assert_eq!(fails("raise 3").exc, ExcType::TypeError);
    assert_eq!(fails("raise").exc, ExcType::RuntimeError);
}

#[test]
fn bare_raise_rethrows_the_handled_failure() {
    let src = "\
try:
    [][1]
except IndexError:
    raise";
    assert_eq!(fails(src).exc, ExcType::IndexError);
}

#[test]
fn handler_failures_propagate() {
    let src = "\
try:
    1 / 0
except ZeroDivisionError:
    undefined_name";
    assert_eq!(fails(src).exc, ExcType::NameError);
}

#[test]
fn exceptions_are_values() {
    assert_eq!(eval("e = ValueError('a', 2)\ne.args"), eval("('a', 2)"));
    assert_eq!(eval("isinstance(KeyError('k'), LookupError)"), Value::Bool(true));
    assert_eq!(output("print(ValueError('shown'))"), "shown\n");
}

#[test]
fn failure_reports_line_and_source() {
    let err = fails("x = 1\ny = zz + 1");
    assert_eq!(err.line(), Some(2));
    let rendered = err.to_string();
    assert!(rendered.starts_with("NameError: name `zz` is not defined"), "{rendered}");
    assert!(rendered.contains("y = zz + 1"), "{rendered}");
}

#[test]
fn errors_after_a_failure_do_not_accumulate() {
    let (mut interp, out) = quiet();
    assert!(interp.eval("print('before')\n1 / 0\nprint('after')").is_err());
    assert_eq!(out.get_output(), "before\n");
    assert_eq!(interp.errors()[0].exc, ExcType::ZeroDivisionError);
}
