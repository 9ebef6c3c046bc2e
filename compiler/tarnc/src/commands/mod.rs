//! Command handlers for the Tarn CLI.
//!
//! Each handler returns the process exit code; `main` decides whether to exit.

mod check;
mod run;

#[cfg(test)]
mod tests;

use std::time::Duration;

use tarn_eval::{Interpreter, ResourceLimits};

pub(crate) use check::check_file;
pub(crate) use run::{eval_source, run_file};

/// Flags shared by `run` and `eval`.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Options {
    pub limits: ResourceLimits,
    pub debug: bool,
    pub arrays: bool,
    pub trace: bool,
}

impl Options {
    /// An interpreter writing to the process streams under these options.
    pub(crate) fn interpreter(&self) -> Interpreter {
        Interpreter::builder()
            .limits(self.limits)
            .debug(self.debug)
            .use_arrays(self.arrays)
            .trace(self.trace)
            .build()
    }
}

pub(crate) fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    for arg in args {
        if let Some(secs) = arg.strip_prefix("--max-time=") {
            let secs: f64 = secs
                .parse()
                .map_err(|_| format!("invalid --max-time value '{secs}'"))?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(format!("--max-time must be positive, got '{secs}'"));
            }
            options.limits.max_time = Duration::from_secs_f64(secs);
        } else if let Some(steps) = arg.strip_prefix("--max-steps=") {
            options.limits.max_steps = steps
                .parse()
                .map_err(|_| format!("invalid --max-steps value '{steps}'"))?;
        } else if let Some(depth) = arg.strip_prefix("--max-depth=") {
            options.limits.max_call_depth = depth
                .parse()
                .map_err(|_| format!("invalid --max-depth value '{depth}'"))?;
        } else {
            match arg.as_str() {
                "--debug" => options.debug = true,
                "--arrays" => options.arrays = true,
                "--trace" => options.trace = true,
                other => return Err(format!("unknown option '{other}'")),
            }
        }
    }
    Ok(options)
}

/// Read a file, reporting a readable message on failure.
pub(crate) fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        std::io::ErrorKind::PermissionDenied => {
            format!("permission denied reading '{path}'")
        }
        std::io::ErrorKind::InvalidData => {
            format!("'{path}' is not valid UTF-8")
        }
        _ => format!("cannot read '{path}': {e}"),
    })
}
