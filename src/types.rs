//! Core data types for the trace alignment engine.
//!
//! This module defines the fundamental types shared across the resampling,
//! feature extraction and probability stages. All types are sized to known
//! maxima so that a session never triggers unbounded allocation growth on
//! the per-keystroke hot path.
//!
//! Design principle: Types should make intent obvious. If a concept exists,
//! it gets a type. Never pass raw tuples or untyped collections across
//! boundaries.

/// Maximum number of code points in an assembled word. Bounds the
/// most-probable-string buffer and the discrete-key proximity table.
pub const MAX_WORD_LENGTH: usize = 48;

/// Fixed capacity of a proximity code point row: one primary slot, near
/// slots, an optional delimiter and additional slots.
pub const MAX_PROXIMITY_CHARS_SIZE: usize = 16;

/// Maximum number of keys a keyboard geometry may report. Key sets are
/// fixed-width bitsets over this many bits.
pub const MAX_KEY_COUNT: usize = 64;

/// Sentinel "far" length returned for unknown code points and for
/// probability lookups with no recorded entry. Values at or above this
/// level mean "no alignment evidence at all". Unit: key widths.
pub const MAX_POINT_TO_KEY_LENGTH: f32 = 10.0;

/// Delimiter separating the near region of a proximity row from the
/// additional-proximity region. Chosen below every printable code point so
/// the zero-filled tail of a row also terminates a scan.
pub const ADDITIONAL_PROXIMITY_DELIMITER: i32 = 2;

/// Code point slot value meaning "empty".
pub const NOT_A_CODE_POINT: i32 = 0;

/// Sentinel for an absent normalized squared distance entry.
pub const NOT_A_DISTANCE: i32 = -1;

/// A resampled point summarizing one or more consecutive raw trace samples.
///
/// Sampled points keep the exact coordinates and timestamp of the raw
/// sample that produced them (`original_index` into the caller's arrays).
/// This exactness is what makes the continuation prefix check a plain
/// equality test rather than a tolerance comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampledPoint {
    /// X coordinate in keyboard pixels.
    pub x: i32,
    /// Y coordinate in keyboard pixels.
    pub y: i32,
    /// Timestamp in milliseconds, monotonic within a trace.
    pub time: i32,
    /// Index of the raw sample this point was taken from. Strictly
    /// increasing across the sampled sequence.
    pub original_index: usize,
}

impl SampledPoint {
    pub fn new(x: i32, y: i32, time: i32, original_index: usize) -> Self {
        Self {
            x,
            y,
            time,
            original_index,
        }
    }

    /// Euclidean distance to another sampled point, in pixels.
    pub fn distance_to(&self, other: &SampledPoint) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One incremental batch of raw input, borrowed from the caller.
///
/// The coordinate, time and pointer-id arrays are parallel. In continuation
/// mode every call carries the full trace so far (a superset of the
/// previous call); the session decides how much of it is reusable.
///
/// Empty coordinate arrays are a valid input: the geometric stages are
/// skipped and the sampled count stays at zero.
#[derive(Debug, Clone, Copy)]
pub struct TraceInput<'a> {
    /// Pointer this update is tracking. Samples from other pointers are
    /// ignored in gesture mode.
    pub pointer_id: i32,
    /// Cap applied to point-to-key length queries, in key widths.
    pub max_point_to_key_length: f32,
    /// Key codes actually produced, for discrete-key mode. `None` for
    /// gesture input.
    pub input_codes: Option<&'a [i32]>,
    /// X coordinates in keyboard pixels.
    pub xs: &'a [i32],
    /// Y coordinates in keyboard pixels.
    pub ys: &'a [i32],
    /// Timestamps in milliseconds.
    pub times: &'a [i32],
    /// Pointer id per sample. May be empty, meaning all samples belong to
    /// `pointer_id`.
    pub pointer_ids: &'a [i32],
    /// True for a continuous gesture trace, false for discrete key taps.
    pub is_gesture: bool,
}

impl<'a> TraceInput<'a> {
    /// Number of raw samples in this batch.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Whether the sample at `index` belongs to the tracked pointer.
    pub fn belongs_to_pointer(&self, index: usize) -> bool {
        self.pointer_ids.is_empty() || self.pointer_ids[index] == self.pointer_id
    }
}

/// Fixed-width bitset over key ids.
///
/// One of these per sampled point marks the keys geometrically near the
/// point (and, in a second instance, the refined set eligible for search).
/// A single machine word keeps set tests branch-free and cache-friendly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySet(u64);

impl KeySet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, key_id: usize) {
        debug_assert!(key_id < MAX_KEY_COUNT, "key id {key_id} out of range");
        self.0 |= 1u64 << key_id;
    }

    pub fn contains(&self, key_id: usize) -> bool {
        debug_assert!(key_id < MAX_KEY_COUNT, "key id {key_id} out of range");
        (self.0 >> key_id) & 1 == 1
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if every key in `self` is also in `other`.
    pub fn is_subset_of(&self, other: &KeySet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterate set key ids in ascending order.
    pub fn iter(&self) -> KeySetIter {
        KeySetIter(self.0)
    }
}

/// Iterator over the key ids of a [`KeySet`], ascending.
pub struct KeySetIter(u64);

impl Iterator for KeySetIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let id = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(id)
    }
}

/// Outcome of matching one dictionary code point against the proximity row
/// of one input position.
///
/// The four cases are mutually exclusive for a fixed (index, candidate)
/// pair. They let the downstream search apply graded edit-distance
/// penalties: exact, geometrically close, weakly close, unrelated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityMatch {
    /// The candidate is what the user typed at this position (raw or
    /// accent-stripped form).
    Equivalent,
    /// The candidate is in the near-proximity region, or is a pure
    /// accent/case variant of the typed key (in which case `slot` is
    /// `None`).
    Near { slot: Option<usize> },
    /// The candidate is in the additional, weaker proximity region past
    /// the delimiter.
    AdditionalNear { slot: usize },
    /// No relationship.
    Unrelated,
}

impl ProximityMatch {
    /// True for any outcome other than [`ProximityMatch::Unrelated`].
    pub fn is_related(&self) -> bool {
        !matches!(self, ProximityMatch::Unrelated)
    }
}
