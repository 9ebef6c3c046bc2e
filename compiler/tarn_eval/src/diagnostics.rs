//! Host-facing failure reports.
//!
//! When an evaluation fails, the interpreter turns the `EvalError` into
//! `ErrorRecord`s: one primary record for the failing node, then one per
//! procedure frame the error passed through. The records stay queryable
//! through `Interpreter::errors()` until the next evaluation, and compose
//! into the single `EvalFailure` returned to the host.

use std::fmt::Write;

use tarn_ir::Location;

use crate::errors::{ErrorKind, EvalError};
use crate::value::ExcType;

/// One entry in the error list of the last evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub exc: ExcType,
    pub message: String,
    pub loc: Option<Location>,
    /// Text of the offending source line, when known.
    pub source: Option<String>,
}

impl ErrorRecord {
    pub fn line(&self) -> Option<u32> {
        self.loc.map(|l| l.line)
    }
}

/// Ordered collection of records for one evaluation.
#[derive(Clone, Debug, Default)]
pub struct ErrorAccumulator {
    records: Vec<ErrorRecord>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        ErrorAccumulator::default()
    }

    pub fn push(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// Record `err` as the primary failure plus its frames.
    pub fn record(&mut self, err: &EvalError, source: Option<&str>) {
        let line_text = |line: u32| {
            source.and_then(|src| {
                src.lines()
                    .nth(line.saturating_sub(1) as usize)
                    .map(str::to_string)
            })
        };
        self.push(ErrorRecord {
            kind: err.kind,
            exc: err.exc,
            message: err.message.clone(),
            loc: err.loc,
            source: err.loc.and_then(|l| line_text(l.line)),
        });
        for frame in &err.frames {
            let loc = Location::new(frame.line, 0);
            self.push(ErrorRecord {
                kind: err.kind,
                exc: err.exc,
                message: format!("in procedure `{}`", frame.name),
                loc: Some(loc),
                source: line_text(frame.line),
            });
        }
    }
}

/// The failure returned from `Interpreter::eval`.
///
/// `Display` renders the primary message, the offending line with a caret
/// under the failing column, and the procedure frames.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{rendered}")]
pub struct EvalFailure {
    pub kind: ErrorKind,
    pub exc: ExcType,
    pub message: String,
    pub loc: Option<Location>,
    pub records: Vec<ErrorRecord>,
    rendered: String,
}

impl EvalFailure {
    pub fn from_records(records: Vec<ErrorRecord>) -> Option<EvalFailure> {
        let primary = records.first()?.clone();
        let rendered = render(&records);
        Some(EvalFailure {
            kind: primary.kind,
            exc: primary.exc,
            message: primary.message,
            loc: primary.loc,
            records,
            rendered,
        })
    }

    pub fn line(&self) -> Option<u32> {
        self.loc.map(|l| l.line)
    }

    /// Whether the failure came from a resource limit.
    pub fn is_resource(&self) -> bool {
        self.kind == ErrorKind::Resource
    }
}

fn render(records: &[ErrorRecord]) -> String {
    let mut out = String::new();
    let Some((primary, frames)) = records.split_first() else {
        return out;
    };
    let _ = write!(out, "{}: {}", primary.exc, primary.message);
    if let (Some(loc), Some(text)) = (primary.loc, &primary.source) {
        let prefix = format!("  line {}: ", loc.line);
        let _ = write!(out, "\n{prefix}{text}");
        let caret = prefix.len() + loc.column as usize;
        let _ = write!(out, "\n{:caret$}^", "");
    } else if let Some(loc) = primary.loc {
        let _ = write!(out, "\n  line {}", loc.line);
    }
    for frame in frames {
        match frame.line() {
            Some(line) => {
                let _ = write!(out, "\n  {} (line {line})", frame.message);
            }
            None => {
                let _ = write!(out, "\n  {}", frame.message);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{name_not_defined, Frame};
    use std::rc::Rc;

    #[test]
    fn failure_renders_line_caret_and_frames() {
        let mut err = name_not_defined("zz").at(Location::new(3, 8));
        err.frames.push(Frame {
            name: Rc::from("f"),
            line: 1,
        });
        let mut acc = ErrorAccumulator::new();
        acc.record(&err, Some("def f():\n    return 1\ny = 1 + zz\n"));
        assert_eq!(acc.len(), 2);
        let failure = EvalFailure::from_records(acc.records().to_vec());
        let text = failure.map(|f| f.to_string()).unwrap_or_default();
        assert_eq!(
            text,
            "NameError: name `zz` is not defined\n  line 3: y = 1 + zz\n                  ^\n  in procedure `f` (line 1)"
        );
    }

    #[test]
    fn empty_records_make_no_failure() {
        assert!(EvalFailure::from_records(Vec::new()).is_none());
    }
}
