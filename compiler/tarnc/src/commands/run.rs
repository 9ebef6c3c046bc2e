use tarn_eval::value::repr::repr;
use tarn_eval::{ErrorMode, EvalFailure, Interpreter, Value};

use super::{read_file, Options};

/// `tarn run`: execute a script for its side effects.
pub(crate) fn run_file(path: &str, options: &Options) -> i32 {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("error: {message}");
            return 1;
        }
    };
    let mut interp = options.interpreter();
    tracing::debug!(path, id = ?interp.id(), "running script");
    let result = interp.eval_with(&source, ErrorMode::Raise);
    finish(&interp, options, result.map(|_| ()))
}

/// `tarn eval`: evaluate source text and print the value it produces.
pub(crate) fn eval_source(source: &str, options: &Options) -> i32 {
    let mut interp = options.interpreter();
    let result = interp.eval_with(source, ErrorMode::Raise).map(|value| {
        if !matches!(value, Value::None) {
            println!("{}", repr(&value));
        }
    });
    finish(&interp, options, result)
}

fn finish(
    interp: &Interpreter,
    options: &Options,
    result: Result<(), EvalFailure>,
) -> i32 {
    if options.trace {
        for line in interp.trace() {
            eprintln!("{line}");
        }
    }
    tracing::debug!(steps = interp.steps_taken(), "run finished");
    match result {
        Ok(()) => 0,
        Err(failure) => {
            eprintln!("{failure}");
            1
        }
    }
}
