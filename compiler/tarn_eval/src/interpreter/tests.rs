#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;
use crate::errors::ErrorKind;
use crate::print_handler::buffer_handler;
use crate::value::{ExcType, Int};

fn interp() -> Interpreter {
    Interpreter::builder()
        .writer(buffer_handler())
        .err_writer(buffer_handler())
        .build()
}

#[test]
fn flow_normal_is_the_only_non_signal() {
    assert!(Flow::Normal(Value::None).is_normal());
    assert!(!Flow::Break.is_normal());
    assert!(!Flow::Continue.is_normal());
    assert!(!Flow::Return(Value::None).is_normal());
}

#[test]
fn guard_restores_namespace_on_drop() {
    let mut it = interp();
    it.set_symbol("x", Value::int(1)).unwrap();
    {
        let mut frame = it.enter_procedure().unwrap();
        frame.namespace.insert(Ident::from("x"), Value::int(2));
        frame.namespace.insert(Ident::from("tmp"), Value::None);
        assert_eq!(frame.get_symbol("x"), Some(Value::int(2)));
    }
    assert_eq!(it.get_symbol("x"), Some(Value::int(1)));
    assert_eq!(it.get_symbol("tmp"), None);
    assert_eq!(it.governor.depth(), 0);
}

#[test]
fn failed_call_restores_caller_bindings() {
    let mut it = interp();
    let source = "x = 1\ndef f(a):\n    x = 99\n    return a + zz\nf(2)";
    let err = it.eval(source).unwrap_err();
    assert_eq!(err.exc, ExcType::NameError);
    assert_eq!(it.get_symbol("x"), Some(Value::int(1)));
    assert_eq!(it.get_symbol("a"), None);
}

#[test]
fn procedure_frames_appear_in_the_trail() {
    let mut it = interp();
    let err = it.eval("def f():\n    return 1 / 0\nf()").unwrap_err();
    assert_eq!(err.exc, ExcType::ZeroDivisionError);
    assert!(it.errors().len() >= 2, "expected a frame record: {:?}", it.errors());
    assert!(err.to_string().contains("`f`"));
}

#[test]
fn call_depth_is_bounded() {
    let mut it = Interpreter::builder().max_call_depth(30).writer(buffer_handler()).build();
    let err = it.eval("def f(n):\n    return f(n + 1)\nf(0)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resource);
    assert_eq!(err.exc, ExcType::RecursionError);
}

#[test]
fn procedures_are_bound_to_their_instance() {
    let mut a = interp();
    a.eval("def double(n):\n    return n * 2").unwrap();
    let double = a.get_symbol("double").unwrap();
    assert_eq!(a.call(&double, CallArgs::new(vec![Value::int(4)])).unwrap(), Value::int(8));

    let mut b = interp();
    let err = b.call(&double, CallArgs::new(vec![Value::int(4)])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("different interpreter"));
}

#[test]
fn host_functions_receive_arguments() {
    let mut it = interp();
    it.add_function("twice", |args| {
        let n = args.get(0).and_then(Value::as_int).unwrap_or(Int::ZERO);
        Ok(Value::Int(n.mul(&Int::from_i64(2))))
    })
    .unwrap();
    assert_eq!(it.eval("twice(21)").unwrap(), Value::int(42));
}

#[test]
fn host_cannot_bind_reserved_names() {
    let mut it = interp();
    assert!(it.set_symbol("eval", Value::None).is_err());
    assert!(it.set_symbol("not an ident", Value::None).is_err());
    assert!(it.set_symbol("ok_name", Value::None).is_ok());
    assert!(it.names().iter().any(|n| &**n == "ok_name"));
    assert_eq!(it.remove_symbol("ok_name"), Some(Value::None));
}

#[test]
fn trace_lines_describe_evaluation() {
    let mut it = Interpreter::builder().trace(true).writer(buffer_handler()).build();
    it.eval("x = 42\nx\n1 + 2").unwrap();
    let trace = it.trace();
    assert!(trace.contains(&"Line 1: Assigned value of 42 to `x`.".to_string()), "{trace:?}");
    assert!(trace.contains(&"Line 2: Value of `x` is `42`.".to_string()), "{trace:?}");
    assert!(trace.contains(&"Line 3: Operation `1 + 2` returned `3`.".to_string()), "{trace:?}");

    it.set_trace(false);
    it.eval("y = 1").unwrap();
    assert!(it.trace().is_empty());
}

#[test]
fn trace_covers_operators_returns_and_blocks() {
    let mut it = Interpreter::builder().trace(true).writer(buffer_handler()).build();
    let source = "x = 1\nnot x\nx < 2\nx and 0\nx\ndef f():\n    return x\nf()\n\
try:\n    pass\nexcept ValueError:\n    pass\nelse:\n    y = 2\nfinally:\n    y = 3\n\
try:\n    int('x')\nexcept ValueError:\n    pass";
    it.eval(source).unwrap();
    let trace = it.trace();
    for expected in [
        "Line 2: Operation `not 1` returned `False`.",
        "Line 3: Comparison `1 < 2` returned `True`.",
        "Line 4: Boolean expression returned `0`.",
        "Line 5: Expression returned `1`.",
        "Line 7: Returning `1`.",
        "Line 14: Executing `else` block.",
        "Line 16: Executing `finally` block.",
    ] {
        assert!(trace.iter().any(|line| line == expected), "missing {expected}: {trace:?}");
    }
    assert!(
        trace
            .iter()
            .any(|line| line.starts_with("Line 18: Function `int(") && line.contains("raised on exception")),
        "{trace:?}"
    );
}

#[test]
fn report_mode_writes_to_err_writer() {
    let errors = buffer_handler();
    let mut it = Interpreter::builder()
        .writer(buffer_handler())
        .err_writer(errors.clone())
        .build();
    let result = it.eval_with("undefined_name", ErrorMode::Report).unwrap();
    assert_eq!(result, Value::None);
    assert!(errors.get_output().contains("name `undefined_name` is not defined"));
}

#[test]
fn each_eval_starts_with_a_clean_trail() {
    let mut it = interp();
    assert!(it.eval("1/0").is_err());
    assert!(!it.errors().is_empty());
    assert_eq!(it.eval("3").unwrap(), Value::int(3));
    assert!(it.errors().is_empty());
}

#[test]
fn print_goes_to_writer() {
    let out = buffer_handler();
    let mut it = Interpreter::builder().writer(out.clone()).build();
    it.eval("print('a', 1)\nprint('b', end='')").unwrap();
    assert_eq!(out.get_output(), "a 1\nb");
}

#[test]
fn steps_are_counted() {
    let mut it = interp();
    it.eval("x = 1").unwrap();
    let small = it.steps_taken();
    it.eval("for i in range(100):\n    x = i").unwrap();
    assert!(it.steps_taken() > small * 50);
}

#[test]
fn instance_ids_are_unique() {
    assert_ne!(interp().id(), interp().id());
}
