//! Error types for the trace alignment engine.
//!
//! The engine draws a hard line between recoverable caller-surface
//! conditions (modelled here) and contract violations (out-of-range query
//! indices, negative key ids), which are programming errors checked with
//! `debug_assert!` at the query sites and never surfaced as `Result`s.
//!
//! Genuinely absent input (empty coordinate arrays) is not an error at all:
//! the session simply ends the update with zero sampled points.

use thiserror::Error;

/// Recoverable errors raised by the trace alignment session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    /// The parallel input arrays disagree on length. Every update must
    /// supply x, y and time arrays of equal length (pointer ids and input
    /// codes, when present, must match as well).
    #[error(
        "mismatched input arrays: xs={xs}, ys={ys}, times={times}, \
         pointer_ids={pointer_ids}, input_codes={input_codes}"
    )]
    MismatchedInputArrays {
        xs: usize,
        ys: usize,
        times: usize,
        pointer_ids: usize,
        input_codes: usize,
    },

    /// The keyboard geometry reports more keys than the fixed-width key
    /// sets can represent.
    #[error("keyboard has {count} keys, more than the supported maximum {max}")]
    TooManyKeys { count: usize, max: usize },

    /// A discrete-key input sequence is longer than the maximum supported
    /// word length.
    #[error("discrete input of {size} codes exceeds the maximum word length {max}")]
    InputTooLong { size: usize, max: usize },
}
