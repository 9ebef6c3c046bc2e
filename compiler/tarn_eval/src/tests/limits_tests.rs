//! Resource ceilings and independent instances.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::{eval, fails};
use crate::errors::ErrorKind;
use crate::print_handler::silent_handler;
use crate::value::ExcType;
use crate::{Interpreter, Value};

#[test]
fn exponent_ceiling() {
    assert!(matches!(eval("10 ** 10000"), Value::Int(_)));
    let err = fails("10 ** 10001");
    assert_eq!(err.kind, ErrorKind::Resource);
    assert_eq!(err.exc, ExcType::MemoryError);
}

#[test]
fn shift_ceiling() {
    assert!(matches!(eval("1 << 1000"), Value::Int(_)));
    assert_eq!(fails("1 << 1001").kind, ErrorKind::Resource);
}

#[test]
fn string_length_ceiling() {
    assert_eq!(eval("len('*' * (2 << 17))"), Value::int(262_144));
    assert_eq!(fails("'*' * (1 + 2 << 17)").kind, ErrorKind::Resource);
    assert_eq!(fails("'*' * (2 << 17) + '*'").kind, ErrorKind::Resource);
    assert_eq!(fails("[0] * (2 << 20)").kind, ErrorKind::Resource);
}

#[test]
fn float_overflow_is_a_runtime_failure() {
    let err = fails("10.0 ** 400");
    assert_eq!(err.exc, ExcType::OverflowError);
    assert_eq!(err.kind, ErrorKind::Runtime);
}

#[test]
fn debug_mode_still_stops_on_steps() {
    let mut interp = Interpreter::builder()
        .debug(true)
        .max_steps(10_000)
        .writer(silent_handler())
        .err_writer(silent_handler())
        .build();
    let err = interp.eval("while True:\n    pass").unwrap_err();
    assert!(err.is_resource());
    assert_eq!(err.message, "Max cycles exceeded, max is 10000");
}

#[test]
fn time_limit_stops_long_scripts() {
    let mut interp = Interpreter::builder()
        .max_time(Duration::from_millis(50))
        .max_steps(u64::MAX)
        .writer(silent_handler())
        .err_writer(silent_handler())
        .build();
    let err = interp.eval("while True:\n    pass").unwrap_err();
    assert!(err.is_resource());
    assert!(err.message.starts_with("Execution exceeded time limit"), "{}", err.message);
}

#[test]
fn builtins_charge_bulk_work() {
    let mut interp = Interpreter::builder()
        .max_steps(1_000)
        .writer(silent_handler())
        .build();
    assert!(interp.eval("list(range(10 ** 9))").unwrap_err().is_resource());
    assert!(interp.eval("sorted(range(100))").is_ok());
}

#[test]
fn limits_can_change_between_runs() {
    let mut interp = Interpreter::builder().writer(silent_handler()).build();
    let mut limits = *interp.limits();
    limits.max_exponent = 10;
    interp.set_limits(limits);
    assert!(interp.eval("2 ** 11").is_err());
    assert_eq!(interp.eval("2 ** 10").unwrap(), Value::int(1024));
}

#[test]
fn instances_run_independently_on_threads() {
    let handles: Vec<_> = (0..2_i64)
        .map(|n| {
            thread::spawn(move || {
                let mut interp = Interpreter::builder().writer(silent_handler()).build();
                interp
                    .eval(&format!("x = {n}\nfor i in range(1000):\n    x += 1\nx"))
                    .map(|value| value.to_string())
                    .map_err(|e| e.to_string())
            })
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap_or_else(|_| Err("thread panicked".into())))
        .collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_deref(), Ok("1000"));
    assert_eq!(results[1].as_deref(), Ok("1001"));
}

#[test]
fn repeating_an_empty_sequence_is_immediate() {
    assert_eq!(eval("x = [] * (10**10)\nlen(x)"), Value::int(0));
    assert_eq!(eval("len(() * 10**10)"), Value::int(0));
    assert_eq!(eval("len('' * 10**10)"), Value::int(0));
}

#[test]
fn integer_results_are_width_limited() {
    let err = fails("x = 10**10000\ny = x ** 1000");
    assert_eq!(err.kind, ErrorKind::Resource);
    assert!(err.message.starts_with("Integer result too large"), "{}", err.message);
    assert_eq!(fails("x = 10**10000\nfor i in range(100):\n    x = x * x").kind, ErrorKind::Resource);
}
