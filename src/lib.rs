//! Trace Alignment Evidence Engine
//!
//! Converts raw touch traces over a keyboard layout into structured
//! alignment evidence: which keys each part of the trace was plausibly
//! aimed at, and how strongly. Downstream word search consumes the
//! evidence; this library never ranks words itself.
//!
//! # Design Philosophy
//!
//! - **Evidence first, interpretation later**: The engine scores per-point
//!   key alignment without deciding what word was meant.
//! - **Incremental by construction**: Re-submitting a grown trace reuses
//!   everything except the provisional tail; committed state is frozen.
//! - **Bounded hot path**: Sampling thins the input independent of the
//!   hardware report rate, and every buffer is sized by a known maximum.
//! - **Geometry is borrowed, never owned**: Keyboard layout data stays with
//!   the caller behind the [`KeyboardGeometry`] trait.
//!
//! # Example
//!
//! ```ignore
//! use trace_align::{TraceInput, TraceSession};
//!
//! let mut session = TraceSession::new(&keyboard)?;
//! session.update(&TraceInput {
//!     pointer_id: 0,
//!     max_point_to_key_length: 10.0,
//!     input_codes: None,
//!     xs: &xs,
//!     ys: &ys,
//!     times: &times,
//!     pointer_ids: &[],
//!     is_gesture: true,
//! })?;
//!
//! let (codes, probability) = session.most_probable_string();
//! ```

pub mod chars;
pub mod error;
pub mod features;
pub mod geometry;
pub mod matching;
pub mod probability;
pub mod sampler;
pub mod session;
pub mod types;


// Re-export the session-facing surface
pub use error::TraceError;
pub use features::FeatureConfig;
pub use geometry::KeyboardGeometry;
pub use matching::ProximityRow;
pub use probability::ProbabilityConfig;
pub use sampler::SamplerConfig;
pub use session::TraceSession;
pub use types::{
    KeySet, ProximityMatch, SampledPoint, TraceInput, MAX_KEY_COUNT, MAX_POINT_TO_KEY_LENGTH,
    MAX_PROXIMITY_CHARS_SIZE, MAX_WORD_LENGTH,
};
