//! Stack growth for the recursive parts of Tarn.
//!
//! The parser descends once per nesting level of a script, and the evaluator
//! descends once per nested node. A hostile script such as `((((...))))` or a
//! deeply recursive procedure would otherwise overflow the native stack long
//! before the evaluator's own call-depth limit is reached. Each recursive
//! entry point wraps its body in [`ensure_sufficient_stack`], which grows
//! the stack on a fresh segment when the remaining space is low.
//!
//! On `wasm32` the call is a plain passthrough.

/// Remaining-space threshold below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if fewer than `RED_ZONE` bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Bytes of stack left on the current segment, when the platform reports it.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
