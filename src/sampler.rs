//! Touch trace resampling with incremental continuation.
//!
//! Raw touch hardware reports far more samples than the geometric stages
//! need. The sampler thins a raw (x, y, t, pointerId) stream into an
//! ordered sequence of [`SampledPoint`]s: a raw point is committed only if
//! it moved far enough from the last committed point or if a pause
//! elapsed. This bounds the sampled count independent of the hardware
//! report rate, which bounds all downstream work.
//!
//! Continuation: when the same trace is re-submitted with more samples
//! appended, the sampler detects the shared prefix, discards only its last
//! two committed points (those are provisional while the finger is still
//! moving) and resumes from there. Everything before the trim point is
//! frozen for the life of the session.

use log::trace;

use crate::types::{SampledPoint, TraceInput};

/// Tuning for the resampling policy.
///
/// Thresholds scale by the keyboard's most common key width so the policy
/// is resolution-independent.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Minimum distance between committed points, as a fraction of the
    /// most common key width. Raw points closer than this are summarized
    /// by the previous committed point.
    pub min_sample_distance_ratio: f32,

    /// A raw point is committed regardless of distance once this much time
    /// has passed since the last committed point. Keeps dwell (hovering
    /// over a key) visible to the speed features.
    pub pause_threshold_ms: i32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_sample_distance_ratio: 0.25,
            pause_threshold_ms: 200,
        }
    }
}

/// The committed sampled sequence plus its cumulative path-length cache.
///
/// Each sampled point summarizes the raw index range from its own
/// `original_index` up to (but excluding) the next point's. Points keep
/// the exact raw coordinates of their anchor sample, so the continuation
/// prefix check is a plain equality test.
#[derive(Debug, Default)]
pub struct SampledTrace {
    points: Vec<SampledPoint>,
    /// `length_cache[i]` = path length in pixels from point 0 to point i
    /// along the sampled polyline.
    length_cache: Vec<f32>,
}

impl SampledTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SampledPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> &SampledPoint {
        debug_assert!(index < self.points.len(), "sampled index {index} out of range");
        &self.points[index]
    }

    /// Path length along the sampled polyline between two sampled indices.
    pub fn path_length_between(&self, from: usize, to: usize) -> f32 {
        debug_assert!(from <= to && to < self.points.len());
        self.length_cache[to] - self.length_cache[from]
    }

    /// Total path length of the sampled polyline.
    pub fn total_length(&self) -> f32 {
        self.length_cache.last().copied().unwrap_or(0.0)
    }

    /// Whether the given raw input is a monotonic extension of the trace
    /// that produced the current sampled state: at least as many raw
    /// samples, and every committed point still matches the raw data at
    /// its original index exactly.
    pub fn is_continuation_of(&self, input: &TraceInput<'_>) -> bool {
        if self.points.is_empty() || input.len() < self.points.len() {
            return false;
        }
        self.points.iter().all(|p| {
            p.original_index < input.len()
                && input.xs[p.original_index] == p.x
                && input.ys[p.original_index] == p.y
                && input.times[p.original_index] == p.time
        })
    }

    /// Drop the last two committed points and return the raw index to
    /// resume scanning from (the original index of the first dropped
    /// point). Callers must only invoke this with more than one point.
    pub fn trim_last_two(&mut self) -> usize {
        debug_assert!(self.points.len() > 1, "trim requires at least two points");
        let new_len = self.points.len() - 2;
        let resume_index = self.points[new_len].original_index;
        self.points.truncate(new_len);
        self.length_cache.truncate(new_len);
        resume_index
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.length_cache.clear();
    }

    /// Scan raw samples from `start_raw` onward and commit new sampled
    /// points per the resampling policy. Gesture input is thinned;
    /// discrete-key input commits every sample (each tap is meaningful).
    ///
    /// The final raw sample of the tracked pointer is always committed so
    /// the trace end stays represented; it is provisional and will be
    /// re-derived by the next continuation.
    pub fn extend_from_raw(
        &mut self,
        input: &TraceInput<'_>,
        start_raw: usize,
        config: &SamplerConfig,
        most_common_key_width: i32,
    ) {
        let min_distance = most_common_key_width as f32 * config.min_sample_distance_ratio;
        let last_pointer_index = (0..input.len())
            .rev()
            .find(|&i| input.belongs_to_pointer(i));

        for raw_index in start_raw..input.len() {
            if !input.belongs_to_pointer(raw_index) {
                continue;
            }
            let candidate = SampledPoint::new(
                input.xs[raw_index],
                input.ys[raw_index],
                input.times[raw_index],
                raw_index,
            );

            let commit = if !input.is_gesture {
                true
            } else {
                match self.points.last() {
                    None => true,
                    Some(last) => {
                        last.distance_to(&candidate) > min_distance
                            || candidate.time - last.time >= config.pause_threshold_ms
                            || Some(raw_index) == last_pointer_index
                    }
                }
            };

            if commit {
                self.push(candidate);
            }
        }
        trace!(
            "sampler: {} committed points after scanning raw [{}, {})",
            self.points.len(),
            start_raw,
            input.len()
        );
    }

    fn push(&mut self, point: SampledPoint) {
        let segment = match self.points.last() {
            Some(last) => last.distance_to(&point),
            None => 0.0,
        };
        let total = self.length_cache.last().copied().unwrap_or(0.0) + segment;
        self.points.push(point);
        self.length_cache.push(total);
    }
}
