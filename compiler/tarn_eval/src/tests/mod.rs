//! End-to-end script tests.
//!
//! Each file drives whole scripts through `Interpreter::eval` and checks
//! the surfaced value or failure.

mod control_tests;
mod exceptions_tests;
mod limits_tests;
mod operators_tests;
mod procedures_tests;
mod properties_tests;
mod sandbox_tests;
mod values_tests;

use crate::diagnostics::EvalFailure;
use crate::print_handler::{buffer_handler, SharedPrintHandler};
use crate::{Interpreter, Value};

/// Interpreter whose script output is captured.
pub(crate) fn quiet() -> (Interpreter, SharedPrintHandler) {
    let out = buffer_handler();
    let interp = Interpreter::builder()
        .writer(out.clone())
        .err_writer(buffer_handler())
        .use_arrays(true)
        .build();
    (interp, out)
}

/// Value of the last statement of `source`; panics on failure.
pub(crate) fn eval(source: &str) -> Value {
    let (mut interp, _) = quiet();
    match interp.eval(source) {
        Ok(value) => value,
        Err(failure) => panic!("script failed:\n{source}\n---\n{failure}"),
    }
}

/// Failure raised by `source`; panics if it succeeds.
pub(crate) fn fails(source: &str) -> EvalFailure {
    let (mut interp, _) = quiet();
    match interp.eval(source) {
        Ok(value) => panic!("script succeeded with {value:?}:\n{source}"),
        Err(failure) => failure,
    }
}

/// Everything `source` printed.
pub(crate) fn output(source: &str) -> String {
    let (mut interp, out) = quiet();
    if let Err(failure) = interp.eval(source) {
        panic!("script failed:\n{source}\n---\n{failure}");
    }
    out.get_output()
}
