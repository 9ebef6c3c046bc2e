//! Optional evaluation trace.
//!
//! When enabled, the evaluator appends one human-readable line per
//! assignment, name read, operator, and call. Lines are kept for the host
//! (`Interpreter::trace()`) and mirrored to `tracing` under the
//! `tarn_eval::trace` target. The buffer is reset at the start of each
//! evaluation.

#[derive(Debug, Default)]
pub struct Tracer {
    enabled: bool,
    lines: Vec<String>,
}

impl Tracer {
    pub fn new(enabled: bool) -> Self {
        Tracer {
            enabled,
            lines: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Record a line. The closure only runs when tracing is on.
    #[inline]
    pub fn record(&mut self, line: u32, message: impl FnOnce() -> String) {
        if !self.enabled {
            return;
        }
        let text = format!("Line {line}: {}", message());
        tracing::trace!(target: "tarn_eval::trace", "{text}");
        self.lines.push(text);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_tracer_skips_formatting() {
        let mut tracer = Tracer::new(false);
        tracer.record(1, || panic!("must not be called"));
        assert!(tracer.lines().is_empty());
    }

    #[test]
    fn enabled_tracer_prefixes_line_numbers() {
        let mut tracer = Tracer::new(true);
        tracer.record(4, || "Value of `x` is `1`.".to_string());
        assert_eq!(tracer.lines(), &["Line 4: Value of `x` is `1`.".to_string()]);
        tracer.clear();
        assert!(tracer.lines().is_empty());
    }
}
