//! Resource limits and the governor that enforces them.
//!
//! Every expression and statement dispatch calls [`Governor::step`], which
//! counts the step and checks the wall-clock deadline. Procedure calls go
//! through [`Governor::enter_call`] for the depth ceiling. The magnitude
//! limits (exponent, shift, string length) are read by the operators.
//!
//! All failures produced here are `ErrorKind::Resource` and pass through
//! every `try` handler untouched.

use std::time::{Duration, Instant};

use crate::errors::{recursion_limit_exceeded, step_limit_exceeded, time_limit_exceeded, EvalError};

/// Ceilings applied to one evaluation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResourceLimits {
    pub max_time: Duration,
    pub max_steps: u64,
    pub max_call_depth: usize,
    /// Largest integer exponent accepted by `**` and `pow()`.
    pub max_exponent: u64,
    /// Largest left shift.
    pub max_shift: u64,
    /// Longest string (or repeated sequence) an operation may build.
    pub max_str_len: usize,
}

impl ResourceLimits {
    pub const DEFAULT_MAX_TIME: Duration = Duration::from_secs(2);
    pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;
    pub const DEFAULT_MAX_EXPONENT: u64 = 10_000;
    pub const DEFAULT_MAX_SHIFT: u64 = 1_000;
    pub const DEFAULT_MAX_STR_LEN: usize = 2 << 17;

    /// Widest integer result `**`, `*` and `<<` may build: a full 64-bit
    /// base raised to `max_exponent`.
    pub fn max_int_bits(&self) -> u64 {
        self.max_exponent.saturating_mul(64)
    }
}

impl Default for ResourceLimits {
    fn default() -> Self {
        ResourceLimits {
            max_time: Self::DEFAULT_MAX_TIME,
            max_steps: Self::DEFAULT_MAX_STEPS,
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
            max_exponent: Self::DEFAULT_MAX_EXPONENT,
            max_shift: Self::DEFAULT_MAX_SHIFT,
            max_str_len: Self::DEFAULT_MAX_STR_LEN,
        }
    }
}

/// Per-evaluation counters checked against `ResourceLimits`.
///
/// In debug mode the deadline is not enforced so a script can be stepped
/// through slowly; the step ceiling still applies.
#[derive(Debug)]
pub struct Governor {
    limits: ResourceLimits,
    debug: bool,
    start: Instant,
    steps: u64,
    depth: usize,
}

impl Governor {
    pub fn new(limits: ResourceLimits, debug: bool) -> Self {
        Governor {
            limits,
            debug,
            start: Instant::now(),
            steps: 0,
            depth: 0,
        }
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: ResourceLimits) {
        self.limits = limits;
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Start a fresh evaluation: zero the counters and the clock.
    pub fn reset(&mut self) {
        self.start = Instant::now();
        self.steps = 0;
        self.depth = 0;
    }

    /// Count one dispatch step.
    #[inline]
    pub fn step(&mut self) -> Result<(), EvalError> {
        self.charge(1)
    }

    /// Count `n` steps at once (bulk work inside builtins).
    pub fn charge(&mut self, n: u64) -> Result<(), EvalError> {
        if !self.debug && self.start.elapsed() > self.limits.max_time {
            tracing::warn!(max_secs = self.limits.max_time.as_secs_f64(), "time limit exceeded");
            return Err(time_limit_exceeded(self.limits.max_time.as_secs_f64()));
        }
        self.steps = self.steps.saturating_add(n);
        if self.steps > self.limits.max_steps {
            tracing::warn!(steps = self.steps, max = self.limits.max_steps, "step limit exceeded");
            return Err(step_limit_exceeded(self.limits.max_steps));
        }
        Ok(())
    }

    /// Enter a procedure call.
    pub fn enter_call(&mut self) -> Result<(), EvalError> {
        if self.depth >= self.limits.max_call_depth {
            tracing::warn!(max = self.limits.max_call_depth, "call depth exceeded");
            return Err(recursion_limit_exceeded(self.limits.max_call_depth));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit_call(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn defaults_match_documented_ceilings() {
        let limits = ResourceLimits::default();
        assert_eq!(limits.max_time, Duration::from_secs(2));
        assert_eq!(limits.max_steps, 1_000_000);
        assert_eq!(limits.max_call_depth, 200);
        assert_eq!(limits.max_str_len, 262_144);
    }

    #[test]
    fn step_ceiling_is_inclusive() {
        let limits = ResourceLimits {
            max_steps: 3,
            ..ResourceLimits::default()
        };
        let mut gov = Governor::new(limits, false);
        for _ in 0..3 {
            assert!(gov.step().is_ok());
        }
        let err = gov.step();
        assert!(matches!(err, Err(e) if e.kind == ErrorKind::Resource
            && e.message == "Max cycles exceeded, max is 3"));
    }

    #[test]
    fn deadline_is_skipped_in_debug_mode() {
        let limits = ResourceLimits {
            max_time: Duration::ZERO,
            ..ResourceLimits::default()
        };
        let mut debug = Governor::new(limits, true);
        std::thread::sleep(Duration::from_millis(2));
        assert!(debug.step().is_ok());
        let mut strict = Governor::new(limits, false);
        std::thread::sleep(Duration::from_millis(2));
        assert!(strict.step().is_err());
    }

    #[test]
    fn deadline_is_reported_before_steps() {
        let limits = ResourceLimits {
            max_time: Duration::ZERO,
            max_steps: 0,
            ..ResourceLimits::default()
        };
        let mut gov = Governor::new(limits, false);
        std::thread::sleep(Duration::from_millis(2));
        let err = gov.step();
        assert!(matches!(err, Err(e) if e.message.starts_with("Execution exceeded time limit")));
    }

    #[test]
    fn int_bit_ceiling_follows_the_exponent_limit() {
        let limits = ResourceLimits {
            max_exponent: 10,
            ..ResourceLimits::default()
        };
        assert_eq!(limits.max_int_bits(), 640);
    }

    #[test]
    fn depth_limit_and_release() {
        let limits = ResourceLimits {
            max_call_depth: 2,
            ..ResourceLimits::default()
        };
        let mut gov = Governor::new(limits, false);
        assert!(gov.enter_call().is_ok());
        assert!(gov.enter_call().is_ok());
        assert!(gov.enter_call().is_err());
        gov.exit_call();
        assert_eq!(gov.depth(), 1);
        assert!(gov.enter_call().is_ok());
    }

    #[test]
    fn reset_clears_counters() {
        let mut gov = Governor::new(ResourceLimits::default(), false);
        assert!(gov.charge(10).is_ok());
        gov.reset();
        assert_eq!(gov.steps(), 0);
    }
}
