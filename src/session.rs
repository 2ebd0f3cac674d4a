//! Per-gesture/word session: orchestration and the outbound query surface.
//!
//! One [`TraceSession`] is created per word being entered and discarded
//! when the stroke or word completes. Each call to [`TraceSession::update`]
//! carries the full raw trace so far; the session decides whether the new
//! data is a monotonic extension of the old (continuation), in which case
//! only the last two committed sampled points are re-derived and all
//! earlier state is reused verbatim.
//!
//! The session is single-threaded and synchronous: it performs no I/O,
//! never blocks, and does all per-update work within bounded, pre-sized
//! buffers. A new word simply discards the session; there is no
//! cancellation path.
//!
//! Query contract: all index-taking accessors require indices inside the
//! sampled (or, for `classify`, discrete input) range. Violations are
//! programming errors checked with `debug_assert!`, not runtime errors.

use log::debug;

use crate::chars::is_skippable_code_point;
use crate::error::TraceError;
use crate::features::{FeatureConfig, TraceFeatures};
use crate::geometry::{self, KeyboardGeometry};
use crate::matching::{classify, ProximityRow};
use crate::probability::{AlignmentProbabilities, ProbabilityConfig};
use crate::sampler::{SampledTrace, SamplerConfig};
use crate::types::{
    ProximityMatch, TraceInput, MAX_KEY_COUNT, MAX_POINT_TO_KEY_LENGTH, MAX_PROXIMITY_CHARS_SIZE,
    MAX_WORD_LENGTH, NOT_A_DISTANCE,
};

/// Fixed-point scale for the touch-correction distance table.
const NORMALIZED_SQUARED_DISTANCE_SCALE: i32 = 1 << 10;

/// Stateful trace alignment session over one keyboard geometry.
#[derive(Debug)]
pub struct TraceSession<'g, G: KeyboardGeometry + ?Sized> {
    geometry: &'g G,
    sampler_config: SamplerConfig,
    feature_config: FeatureConfig,
    probability_config: ProbabilityConfig,

    trace: SampledTrace,
    features: TraceFeatures,
    probabilities: AlignmentProbabilities,

    // Discrete-key state, rebuilt per update in non-gesture mode.
    proximity_rows: Vec<ProximityRow>,
    primary_input_word: heapless::Vec<i32, MAX_WORD_LENGTH>,
    normalized_squared_distances: Vec<i32>,
    touch_correction_enabled: bool,

    max_point_to_key_length: f32,
    is_gesture: bool,
    last_update_was_continuation: bool,
}

impl<'g, G: KeyboardGeometry + ?Sized> TraceSession<'g, G> {
    /// Create a session with default tuning.
    pub fn new(geometry: &'g G) -> Result<Self, TraceError> {
        Self::with_configs(
            geometry,
            SamplerConfig::default(),
            FeatureConfig::default(),
            ProbabilityConfig::default(),
        )
    }

    pub fn with_configs(
        geometry: &'g G,
        sampler_config: SamplerConfig,
        feature_config: FeatureConfig,
        probability_config: ProbabilityConfig,
    ) -> Result<Self, TraceError> {
        let key_count = geometry.key_count();
        if key_count > MAX_KEY_COUNT {
            return Err(TraceError::TooManyKeys {
                count: key_count,
                max: MAX_KEY_COUNT,
            });
        }
        Ok(Self {
            geometry,
            sampler_config,
            feature_config,
            probability_config,
            trace: SampledTrace::new(),
            features: TraceFeatures::new(),
            probabilities: AlignmentProbabilities::new(),
            proximity_rows: Vec::new(),
            primary_input_word: heapless::Vec::new(),
            normalized_squared_distances: Vec::new(),
            touch_correction_enabled: false,
            max_point_to_key_length: MAX_POINT_TO_KEY_LENGTH,
            is_gesture: false,
            last_update_was_continuation: false,
        })
    }

    /// Process one raw input batch, incrementally when possible.
    ///
    /// Empty coordinate arrays are valid: the geometric stages are skipped
    /// and the sampled count stays at zero.
    pub fn update(&mut self, input: &TraceInput<'_>) -> Result<(), TraceError> {
        self.validate(input)?;
        self.max_point_to_key_length = input.max_point_to_key_length;

        let continuation = input.is_gesture == self.is_gesture
            && self.trace.is_continuation_of(input)
            && self.trace.len() > 1;
        let key_width = self.geometry.most_common_key_width();

        let last_saved = if continuation {
            // The last two committed points are never final while the
            // finger may still be moving: re-derive them, reuse the rest.
            let resume = self.trace.trim_last_two();
            let kept = self.trace.len();
            self.trace
                .extend_from_raw(input, resume, &self.sampler_config, key_width);
            kept
        } else {
            self.trace.clear();
            self.features.clear();
            self.probabilities.clear();
            self.trace
                .extend_from_raw(input, 0, &self.sampler_config, key_width);
            0
        };
        self.last_update_was_continuation = continuation;

        self.features.update(
            self.geometry,
            &self.trace,
            last_saved,
            input.is_gesture,
            &self.feature_config,
        );

        if input.is_gesture {
            self.probabilities.update(
                self.geometry,
                &self.features,
                last_saved,
                &self.probability_config,
            );
            self.clear_discrete_state();
        } else {
            self.probabilities.clear();
            self.init_discrete(input);
        }
        self.is_gesture = input.is_gesture;

        debug!(
            "session update: {} raw -> {} sampled ({} reused), gesture={}",
            input.len(),
            self.trace.len(),
            last_saved,
            input.is_gesture
        );
        Ok(())
    }

    fn validate(&self, input: &TraceInput<'_>) -> Result<(), TraceError> {
        let n = input.xs.len();
        let codes_len = input.input_codes.map_or(n, <[i32]>::len);
        let pointer_ids_len = if input.pointer_ids.is_empty() {
            n
        } else {
            input.pointer_ids.len()
        };
        if input.ys.len() != n
            || input.times.len() != n
            || pointer_ids_len != n
            || (input.input_codes.is_some() && n > 0 && codes_len != n)
        {
            return Err(TraceError::MismatchedInputArrays {
                xs: n,
                ys: input.ys.len(),
                times: input.times.len(),
                pointer_ids: input.pointer_ids.len(),
                input_codes: codes_len,
            });
        }
        if !input.is_gesture {
            if let Some(codes) = input.input_codes {
                if codes.len() > MAX_WORD_LENGTH {
                    return Err(TraceError::InputTooLong {
                        size: codes.len(),
                        max: MAX_WORD_LENGTH,
                    });
                }
            }
        }
        Ok(())
    }

    fn clear_discrete_state(&mut self) {
        self.proximity_rows.clear();
        self.primary_input_word.clear();
        self.normalized_squared_distances.clear();
        self.touch_correction_enabled = false;
    }

    /// Build the per-position proximity rows, the primary input word and,
    /// when the layout has touch-correction data, the normalized squared
    /// distance table. Only the primary pointer carries discrete input.
    fn init_discrete(&mut self, input: &TraceInput<'_>) {
        self.clear_discrete_state();
        if input.pointer_id != 0 {
            return;
        }
        let Some(codes) = input.input_codes else {
            return;
        };

        for &code in codes {
            self.proximity_rows
                .push(ProximityRow::build(self.geometry, code));
            // Capacity check happened in validate(); push cannot fail.
            let _ = self.primary_input_word.push(code);
        }

        self.touch_correction_enabled = !self.trace.is_empty()
            && self.geometry.has_touch_position_correction_data()
            && !input.xs.is_empty();
        if self.touch_correction_enabled {
            self.init_normalized_squared_distances(input);
        }
    }

    fn init_normalized_squared_distances(&mut self, input: &TraceInput<'_>) {
        let key_width = self.geometry.most_common_key_width() as f32;
        let key_width_sq = key_width * key_width;
        self.normalized_squared_distances = vec![
            NOT_A_DISTANCE;
            self.proximity_rows.len() * MAX_PROXIMITY_CHARS_SIZE
        ];

        for (index, row) in self.proximity_rows.iter().enumerate() {
            if index >= input.xs.len() {
                break;
            }
            for slot in 0..MAX_PROXIMITY_CHARS_SIZE {
                let code = row.slot(slot);
                let Some(key_id) = self.geometry.key_index_of(code) else {
                    continue;
                };
                let (kx, ky) = self.geometry.key_center(key_id);
                let d_sq =
                    geometry::squared_distance(input.xs[index], input.ys[index], kx, ky);
                self.normalized_squared_distances[index * MAX_PROXIMITY_CHARS_SIZE + slot] =
                    (d_sq * NORMALIZED_SQUARED_DISTANCE_SCALE as f32 / key_width_sq) as i32;
            }
        }
    }

    // ------------------------------------------------------------------
    // Outbound query surface
    // ------------------------------------------------------------------

    /// Number of committed sampled points.
    pub fn sampled_size(&self) -> usize {
        self.trace.len()
    }

    pub fn input_x(&self, index: usize) -> i32 {
        self.trace.point(index).x
    }

    pub fn input_y(&self, index: usize) -> i32 {
        self.trace.point(index).y
    }

    pub fn input_time(&self, index: usize) -> i32 {
        self.trace.point(index).time
    }

    /// Raw input index the sampled point was taken from.
    pub fn input_index(&self, index: usize) -> usize {
        self.trace.point(index).original_index
    }

    /// Distance from a sampled point to the key producing `code_point`,
    /// scaled and capped at the session's maximum. Skippable punctuation
    /// costs nothing; code points not on the keyboard return the far
    /// sentinel.
    pub fn point_to_key_length(&self, index: usize, code_point: i32, scale: f32) -> f32 {
        debug_assert!(index < self.trace.len(), "sampled index {index} out of range");
        match self.geometry.key_index_of(code_point) {
            Some(key_id) => {
                (self.features.distance_to_key(index, key_id) * scale)
                    .min(self.max_point_to_key_length)
            }
            None if is_skippable_code_point(code_point) => 0.0,
            None => MAX_POINT_TO_KEY_LENGTH,
        }
    }

    /// Same as [`Self::point_to_key_length`] for a key id, without the
    /// code point mapping.
    pub fn point_to_key_length_by_id(&self, index: usize, key_id: usize, scale: f32) -> f32 {
        debug_assert!(index < self.trace.len());
        debug_assert!(key_id < self.geometry.key_count(), "key id {key_id} out of range");
        (self.features.distance_to_key(index, key_id) * scale).min(self.max_point_to_key_length)
    }

    /// Whether `key_id` survived speed filtering at `index`.
    pub fn is_key_in_search_keys(&self, index: usize, key_id: usize) -> bool {
        debug_assert!(index < self.trace.len());
        debug_assert!(key_id < self.geometry.key_count());
        self.features.search_key_set(index).contains(key_id)
    }

    /// Angle of the line between two sampled points, in radians.
    pub fn direction(&self, index0: usize, index1: usize) -> f32 {
        debug_assert!(index0 < self.trace.len() && index1 < self.trace.len());
        if index1 == index0 + 1 {
            return self.features.direction(index0);
        }
        let (a, b) = (self.trace.point(index0), self.trace.point(index1));
        geometry::direction(a.x, a.y, b.x, b.y)
    }

    /// Squared distance from a key center to the segment between two
    /// sampled points, in key widths². With `extend`, the segment is
    /// treated as an infinite line. Out-of-range endpoints yield 0.
    pub fn line_to_key_distance(
        &self,
        from: usize,
        to: usize,
        key_id: usize,
        extend: bool,
    ) -> f32 {
        if from >= self.trace.len() || to >= self.trace.len() {
            return 0.0;
        }
        debug_assert!(key_id < self.geometry.key_count());
        let a = self.trace.point(from);
        let b = self.trace.point(to);
        let (kx, ky) = self.geometry.key_center(key_id);
        let key_width = self.geometry.most_common_key_width() as f32;
        geometry::point_to_segment_squared_distance(kx, ky, a.x, a.y, b.x, b.y, extend)
            / (key_width * key_width)
    }

    /// Probability that the point at `index` was aimed at `key_id`; the
    /// far sentinel when no evidence was recorded.
    pub fn probability(&self, index: usize, key_id: usize) -> f32 {
        self.probabilities.probability(index, key_id)
    }

    /// The most probable code point string over all sampled points and
    /// its accumulated score.
    pub fn most_probable_string(&self) -> (&[i32], f32) {
        self.probabilities.most_probable_string()
    }

    /// Classify a dictionary code point against the proximity row of one
    /// discrete input position.
    pub fn classify(
        &self,
        index: usize,
        code_point: i32,
        check_proximity: bool,
    ) -> ProximityMatch {
        debug_assert!(
            index < self.proximity_rows.len(),
            "proximity index {index} out of range"
        );
        classify(&self.proximity_rows[index], code_point, check_proximity)
    }

    /// Slot-0 code points of the discrete input, in order.
    pub fn primary_input_word(&self) -> &[i32] {
        &self.primary_input_word
    }

    /// Whether the touch-correction distance table was populated.
    pub fn touch_position_correction_enabled(&self) -> bool {
        self.touch_correction_enabled
    }

    /// Fixed-point normalized squared distance from the touch position at
    /// `index` to the key of the proximity slot, or [`NOT_A_DISTANCE`].
    pub fn normalized_squared_distance(&self, index: usize, slot: usize) -> i32 {
        debug_assert!(slot < MAX_PROXIMITY_CHARS_SIZE, "slot {slot} out of range");
        if !self.touch_correction_enabled {
            return NOT_A_DISTANCE;
        }
        debug_assert!(index < self.proximity_rows.len());
        self.normalized_squared_distances[index * MAX_PROXIMITY_CHARS_SIZE + slot]
    }

    /// Local speed rate at a sampled point (1.0 ≈ one key width/100 ms).
    pub fn speed_rate(&self, index: usize) -> f32 {
        self.features.speed_rate(index)
    }

    /// Beeline pass-through percentile at a sampled point, 0–1.
    pub fn beeline_speed_percentile(&self, index: usize) -> f32 {
        self.features.beeline_percentile(index)
    }

    /// Average trace speed in pixels per millisecond.
    pub fn average_speed(&self) -> f32 {
        self.features.average_speed()
    }

    /// Whether the previous update reused committed state.
    pub fn last_update_was_continuation(&self) -> bool {
        self.last_update_was_continuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::test_keyboard::TestKeyboard;
    use crate::types::NOT_A_CODE_POINT;

    fn gesture<'a>(xs: &'a [i32], ys: &'a [i32], times: &'a [i32]) -> TraceInput<'a> {
        TraceInput {
            pointer_id: 0,
            max_point_to_key_length: MAX_POINT_TO_KEY_LENGTH,
            input_codes: None,
            xs,
            ys,
            times,
            pointer_ids: &[],
            is_gesture: true,
        }
    }

    fn discrete<'a>(
        codes: &'a [i32],
        xs: &'a [i32],
        ys: &'a [i32],
        times: &'a [i32],
    ) -> TraceInput<'a> {
        TraceInput {
            pointer_id: 0,
            max_point_to_key_length: MAX_POINT_TO_KEY_LENGTH,
            input_codes: Some(codes),
            xs,
            ys,
            times,
            pointer_ids: &[],
            is_gesture: false,
        }
    }

    #[test]
    fn test_empty_input_is_valid_and_inert() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        session.update(&gesture(&[], &[], &[])).unwrap();
        assert_eq!(session.sampled_size(), 0);
        let (codes, p) = session.most_probable_string();
        assert!(codes.is_empty());
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_gesture_update_basic_queries() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let (sx, sy) = keyboard.center_of('s');
        let xs = [sx, sx + 20, sx + 40];
        let ys = [sy, sy, sy];
        let times = [0, 30, 60];
        session.update(&gesture(&xs, &ys, &times)).unwrap();

        assert!(session.sampled_size() > 0);
        assert_eq!(session.input_x(0), sx);
        assert_eq!(session.input_y(0), sy);
        assert_eq!(session.input_time(0), 0);
        assert_eq!(session.input_index(0), 0);

        let s_id = keyboard.key_index_of('s' as i32).unwrap();
        assert!(session.point_to_key_length(0, 's' as i32, 1.0) < 0.01);
        assert!(session.is_key_in_search_keys(0, s_id));
        assert!(session.average_speed() > 0.0);
    }

    #[test]
    fn test_point_to_key_length_special_codes() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        session.update(&gesture(&[100], &[100], &[0])).unwrap();

        assert_eq!(session.point_to_key_length(0, '\'' as i32, 1.0), 0.0);
        assert_eq!(session.point_to_key_length(0, '-' as i32, 1.0), 0.0);
        assert_eq!(
            session.point_to_key_length(0, '!' as i32, 1.0),
            MAX_POINT_TO_KEY_LENGTH
        );
    }

    #[test]
    fn test_point_to_key_length_capped() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let (qx, qy) = keyboard.center_of('q');
        let xs = [qx];
        let ys = [qy];
        let mut input = gesture(&xs, &ys, &[0]);
        input.max_point_to_key_length = 2.0;
        session.update(&input).unwrap();

        // 'p' is nine key widths away from 'q'; the cap must apply.
        let length = session.point_to_key_length(0, 'p' as i32, 1.0);
        assert_eq!(length, 2.0);
    }

    #[test]
    fn test_line_to_key_distance() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let (sx, sy) = keyboard.center_of('s');
        let (fx, fy) = keyboard.center_of('f');
        let xs = [sx, fx];
        let ys = [sy, fy];
        let times = [0, 100];
        session.update(&gesture(&xs, &ys, &times)).unwrap();
        assert!(session.sampled_size() >= 2);

        // 'd' lies on the segment from 's' to 'f'.
        let d_id = keyboard.key_index_of('d' as i32).unwrap();
        let last = session.sampled_size() - 1;
        assert!(session.line_to_key_distance(0, last, d_id, false) < 0.01);
        // Out-of-range endpoints are a defined no-evidence zero.
        assert_eq!(session.line_to_key_distance(0, 99, d_id, false), 0.0);
    }

    #[test]
    fn test_direction_between_indices() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let xs = [100, 160, 220];
        let ys = [120, 120, 120];
        let times = [0, 40, 80];
        session.update(&gesture(&xs, &ys, &times)).unwrap();
        assert!(session.sampled_size() >= 2);

        // Rightward horizontal movement: angle ~0.
        let angle = session.direction(0, session.sampled_size() - 1);
        assert!(angle.abs() < 1e-5);
        let adjacent = session.direction(0, 1);
        assert!(adjacent.abs() < 1e-5);
    }

    #[test]
    fn test_continuation_reuses_state() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let xs: Vec<i32> = (0..20).map(|i| 60 + i * 20).collect();
        let ys = vec![120; 20];
        let times: Vec<i32> = (0..20).map(|i| i * 16).collect();

        session
            .update(&gesture(&xs[..12], &ys[..12], &times[..12]))
            .unwrap();
        assert!(!session.last_update_was_continuation());

        session.update(&gesture(&xs, &ys, &times)).unwrap();
        assert!(session.last_update_was_continuation());
    }

    #[test]
    fn test_new_stroke_resets_state() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let xs: Vec<i32> = (0..10).map(|i| 60 + i * 20).collect();
        let ys = vec![120; 10];
        let times: Vec<i32> = (0..10).map(|i| i * 16).collect();
        session.update(&gesture(&xs, &ys, &times)).unwrap();

        // A different stroke (new coordinates) must not continue.
        let xs2: Vec<i32> = (0..10).map(|i| 500 - i * 20).collect();
        session.update(&gesture(&xs2, &ys, &times)).unwrap();
        assert!(!session.last_update_was_continuation());
        assert_eq!(session.input_x(0), 500);
    }

    #[test]
    fn test_discrete_mode_rows_and_primary_word() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let codes = ['c' as i32, 'a' as i32, 't' as i32];
        let (cx, cy) = keyboard.center_of('c');
        let (ax, ay) = keyboard.center_of('a');
        let (tx, ty) = keyboard.center_of('t');
        let xs = [cx, ax, tx];
        let ys = [cy, ay, ty];
        let times = [0, 150, 300];
        session.update(&discrete(&codes, &xs, &ys, &times)).unwrap();

        assert_eq!(session.primary_input_word(), &codes);
        assert_eq!(session.sampled_size(), 3);
        assert_eq!(session.classify(0, 'c' as i32, true), ProximityMatch::Equivalent);
        assert!(matches!(
            session.classify(0, 'x' as i32, true),
            ProximityMatch::Near { slot: Some(_) }
        ));
        assert_eq!(session.classify(0, 'p' as i32, true), ProximityMatch::Unrelated);
        // Proximity disabled restricts the outcome space.
        assert_eq!(session.classify(0, 'x' as i32, false), ProximityMatch::Unrelated);
    }

    #[test]
    fn test_discrete_secondary_pointer_builds_no_rows() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let codes = ['a' as i32];
        let mut input = discrete(&codes, &[60], &[120], &[0]);
        input.pointer_id = 1;
        session.update(&input).unwrap();
        assert!(session.primary_input_word().is_empty());
    }

    #[test]
    fn test_touch_correction_table() {
        let keyboard = TestKeyboard::qwerty_with_touch_correction();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let codes = ['a' as i32];
        let (ax, ay) = keyboard.center_of('a');
        session
            .update(&discrete(&codes, &[ax], &[ay], &[0]))
            .unwrap();

        assert!(session.touch_position_correction_enabled());
        // Tap dead-center on 'a': slot 0 distance is zero.
        assert_eq!(session.normalized_squared_distance(0, 0), 0);
        // A populated near slot has a positive distance.
        let near_distance = session.normalized_squared_distance(0, 1);
        assert!(near_distance > 0);
        // The zero-filled tail has no distance.
        assert_eq!(
            session.normalized_squared_distance(0, MAX_PROXIMITY_CHARS_SIZE - 1),
            NOT_A_DISTANCE
        );
    }

    #[test]
    fn test_touch_correction_disabled_without_layout_data() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let codes = ['a' as i32];
        session
            .update(&discrete(&codes, &[60], &[120], &[0]))
            .unwrap();
        assert!(!session.touch_position_correction_enabled());
        assert_eq!(session.normalized_squared_distance(0, 0), NOT_A_DISTANCE);
    }

    #[test]
    fn test_mismatched_arrays_rejected() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let err = session
            .update(&gesture(&[1, 2], &[1], &[0, 10]))
            .unwrap_err();
        assert!(matches!(err, TraceError::MismatchedInputArrays { .. }));
    }

    #[test]
    fn test_discrete_input_too_long_rejected() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let codes = vec!['a' as i32; MAX_WORD_LENGTH + 1];
        let input = TraceInput {
            pointer_id: 0,
            max_point_to_key_length: MAX_POINT_TO_KEY_LENGTH,
            input_codes: Some(&codes),
            xs: &[],
            ys: &[],
            times: &[],
            pointer_ids: &[],
            is_gesture: false,
        };
        let err = session.update(&input).unwrap_err();
        assert_eq!(
            err,
            TraceError::InputTooLong {
                size: MAX_WORD_LENGTH + 1,
                max: MAX_WORD_LENGTH
            }
        );
    }

    #[test]
    fn test_too_many_keys_rejected() {
        #[derive(Debug)]
        struct HugeKeyboard;
        impl KeyboardGeometry for HugeKeyboard {
            fn key_count(&self) -> usize {
                MAX_KEY_COUNT + 1
            }
            fn key_center(&self, _: usize) -> (i32, i32) {
                (0, 0)
            }
            fn most_common_key_width(&self) -> i32 {
                60
            }
            fn key_index_of(&self, _: i32) -> Option<usize> {
                None
            }
            fn code_point_of(&self, _: usize) -> i32 {
                NOT_A_CODE_POINT
            }
            fn near_key_code_points(&self, _: i32) -> &[i32] {
                &[]
            }
        }
        let err = TraceSession::new(&HugeKeyboard).unwrap_err();
        assert_eq!(
            err,
            TraceError::TooManyKeys {
                count: MAX_KEY_COUNT + 1,
                max: MAX_KEY_COUNT
            }
        );
    }

    #[test]
    fn test_discrete_without_codes_is_inert() {
        let keyboard = TestKeyboard::qwerty();
        let mut session = TraceSession::new(&keyboard).unwrap();
        let mut input = gesture(&[60], &[120], &[0]);
        input.is_gesture = false;
        session.update(&input).unwrap();
        assert!(session.primary_input_word().is_empty());
        assert_eq!(session.sampled_size(), 1);
    }
}
