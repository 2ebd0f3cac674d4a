//! Alignment probability assignment and most-probable-string assembly.
//!
//! For every newly sampled point, each key in the point's search set gets a
//! score combining three monotone factors:
//! - closeness: a Gaussian in the normalized point-to-key distance,
//! - speed: attenuation for points moving faster than deliberate pace,
//! - beeline: attenuation proportional to the pass-through percentile.
//!
//! The law is a tunable policy, not a contract: the only guarantees are
//! strict monotonicity (closer/slower/more-deliberate never scores lower)
//! and boundedness in [0, 1]. Per-point scores are capped so they never
//! sum above 1, but they are not a strict distribution.
//!
//! Lookups for a (point, key) pair with no recorded entry return the far
//! sentinel [`MAX_POINT_TO_KEY_LENGTH`]; downstream treats any value above
//! 1.0 as "no alignment evidence".

use heapless::FnvIndexMap;
use log::trace;

use crate::features::TraceFeatures;
use crate::geometry::KeyboardGeometry;
use crate::types::{MAX_KEY_COUNT, MAX_POINT_TO_KEY_LENGTH, MAX_WORD_LENGTH};

/// Sparse per-point key probabilities. Fixed capacity: key ids are bounded
/// by [`MAX_KEY_COUNT`], so insertion cannot overflow.
pub type CharProbabilityMap = FnvIndexMap<u8, f32, MAX_KEY_COUNT>;

/// Tuning for the alignment probability law.
#[derive(Debug, Clone)]
pub struct ProbabilityConfig {
    /// Standard deviation of the closeness Gaussian, in key widths.
    pub distance_sigma: f32,

    /// Weight of the speed attenuation. At speed rate `1 + 1/w` the score
    /// halves relative to deliberate pace.
    pub speed_penalty_weight: f32,

    /// Weight of the beeline attenuation. At percentile 1.0 the score is
    /// multiplied by `1 - weight`.
    pub beeline_penalty_weight: f32,

    /// Scores below this floor are dropped to keep the maps sparse.
    pub min_probability: f32,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            distance_sigma: 0.6,
            speed_penalty_weight: 0.6,
            beeline_penalty_weight: 0.9,
            min_probability: 0.001,
        }
    }
}

/// Per-point alignment probabilities plus the assembled most probable
/// string. Owned by the session, rebuilt incrementally per update.
#[derive(Debug, Default)]
pub struct AlignmentProbabilities {
    maps: Vec<CharProbabilityMap>,
    most_probable: heapless::Vec<i32, MAX_WORD_LENGTH>,
    most_probable_probability: f32,
}

impl AlignmentProbabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.maps.clear();
        self.most_probable.clear();
        self.most_probable_probability = 0.0;
    }

    /// Recompute probabilities for points at index >= `last_saved` and
    /// reassemble the most probable string over all points.
    pub fn update<G: KeyboardGeometry + ?Sized>(
        &mut self,
        geometry: &G,
        features: &TraceFeatures,
        last_saved: usize,
        config: &ProbabilityConfig,
    ) {
        self.maps.truncate(last_saved);

        for index in last_saved..features.len() {
            let speed_attenuation = 1.0
                / (1.0
                    + config.speed_penalty_weight
                        * (features.speed_rate(index) - 1.0).max(0.0));
            let beeline_attenuation =
                1.0 - config.beeline_penalty_weight * features.beeline_percentile(index);

            let mut map = CharProbabilityMap::new();
            let mut sum = 0.0f32;
            for key_id in features.search_key_set(index).iter() {
                let distance = features.distance_to_key(index, key_id);
                let closeness = (-0.5 * (distance / config.distance_sigma).powi(2)).exp();
                let score = (closeness * speed_attenuation * beeline_attenuation).clamp(0.0, 1.0);
                if score >= config.min_probability {
                    // Capacity equals MAX_KEY_COUNT, so insertion always fits.
                    let _ = map.insert(key_id as u8, score);
                    sum += score;
                }
            }
            if sum > 1.0 {
                for score in map.values_mut() {
                    *score /= sum;
                }
            }
            self.maps.push(map);
        }

        self.assemble_most_probable(geometry);
        trace!(
            "probabilities: {} point maps, most probable string of {} codes (p={:.4})",
            self.maps.len(),
            self.most_probable.len(),
            self.most_probable_probability
        );
    }

    /// Per-point argmax concatenation. Ties break toward the smaller key
    /// id; points with no entries abstain (neutral factor, no emission);
    /// output is hard-capped at [`MAX_WORD_LENGTH`].
    fn assemble_most_probable<G: KeyboardGeometry + ?Sized>(&mut self, geometry: &G) {
        self.most_probable.clear();
        if self.maps.is_empty() {
            self.most_probable_probability = 0.0;
            return;
        }

        let mut probability = 1.0f32;
        for map in &self.maps {
            let mut best: Option<(u8, f32)> = None;
            for (&key_id, &score) in map.iter() {
                best = match best {
                    None => Some((key_id, score)),
                    Some((bk, bs)) => {
                        if score > bs || (score == bs && key_id < bk) {
                            Some((key_id, score))
                        } else {
                            Some((bk, bs))
                        }
                    }
                };
            }
            let Some((key_id, score)) = best else {
                continue; // abstain
            };
            probability *= score;
            if self.most_probable.push(geometry.code_point_of(key_id as usize)).is_err() {
                break; // buffer full: the cap is the contract
            }
        }
        self.most_probable_probability = if self.most_probable.is_empty() {
            0.0
        } else {
            probability
        };
    }

    /// Number of per-point probability maps (equals the sampled count
    /// after a gesture update).
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Probability that the point at `index` was aimed at `key_id`.
    /// Returns the far sentinel when no entry was recorded.
    pub fn probability(&self, index: usize, key_id: usize) -> f32 {
        debug_assert!(index < self.maps.len(), "probability index {index} out of range");
        debug_assert!(key_id < MAX_KEY_COUNT, "key id {key_id} out of range");
        self.maps[index]
            .get(&(key_id as u8))
            .copied()
            .unwrap_or(MAX_POINT_TO_KEY_LENGTH)
    }

    /// The assembled most probable code point string and its score.
    pub fn most_probable_string(&self) -> (&[i32], f32) {
        (&self.most_probable, self.most_probable_probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureConfig, TraceFeatures};
    use crate::geometry::test_keyboard::{TestKeyboard, KEY_WIDTH};
    use crate::sampler::{SampledTrace, SamplerConfig};
    use crate::types::TraceInput;

    fn run_pipeline(
        keyboard: &TestKeyboard,
        xs: &[i32],
        ys: &[i32],
        times: &[i32],
    ) -> (SampledTrace, TraceFeatures, AlignmentProbabilities) {
        let input = TraceInput {
            pointer_id: 0,
            max_point_to_key_length: MAX_POINT_TO_KEY_LENGTH,
            input_codes: None,
            xs,
            ys,
            times,
            pointer_ids: &[],
            is_gesture: true,
        };
        let mut trace = SampledTrace::new();
        trace.extend_from_raw(&input, 0, &SamplerConfig::default(), KEY_WIDTH);
        let mut features = TraceFeatures::new();
        features.update(keyboard, &trace, 0, true, &FeatureConfig::default());
        let mut probabilities = AlignmentProbabilities::new();
        probabilities.update(keyboard, &features, 0, &ProbabilityConfig::default());
        (trace, features, probabilities)
    }

    #[test]
    fn test_empty_trace_has_no_maps() {
        let keyboard = TestKeyboard::qwerty();
        let (_, _, probabilities) = run_pipeline(&keyboard, &[], &[], &[]);
        assert!(probabilities.is_empty());
        let (codes, p) = probabilities.most_probable_string();
        assert!(codes.is_empty());
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_key_under_point_wins() {
        let keyboard = TestKeyboard::qwerty();
        let (sx, sy) = keyboard.center_of('s');
        let (_, _, probabilities) = run_pipeline(&keyboard, &[sx], &[sy], &[0]);

        let s_id = keyboard.key_index_of('s' as i32).unwrap();
        let a_id = keyboard.key_index_of('a' as i32).unwrap();
        let p_s = probabilities.probability(0, s_id);
        let p_a = probabilities.probability(0, a_id);
        assert!(p_s <= 1.0);
        assert!(p_s > p_a, "key under the point must win: {p_s} vs {p_a}");

        let (codes, p) = probabilities.most_probable_string();
        assert_eq!(codes, &['s' as i32]);
        assert!(p > 0.0);
    }

    #[test]
    fn test_monotone_in_distance() {
        let keyboard = TestKeyboard::qwerty();
        // A point nearer to 's' than to 'd', aligned on the middle row.
        let (sx, sy) = keyboard.center_of('s');
        let (_, features, probabilities) = run_pipeline(&keyboard, &[sx + 10], &[sy], &[0]);

        let s_id = keyboard.key_index_of('s' as i32).unwrap();
        let d_id = keyboard.key_index_of('d' as i32).unwrap();
        assert!(features.distance_to_key(0, s_id) < features.distance_to_key(0, d_id));
        assert!(probabilities.probability(0, s_id) >= probabilities.probability(0, d_id));
    }

    #[test]
    fn test_absent_entry_returns_far_sentinel() {
        let keyboard = TestKeyboard::qwerty();
        let (sx, sy) = keyboard.center_of('s');
        let (_, _, probabilities) = run_pipeline(&keyboard, &[sx], &[sy], &[0]);

        let p_id = keyboard.key_index_of('p' as i32).unwrap();
        assert_eq!(probabilities.probability(0, p_id), MAX_POINT_TO_KEY_LENGTH);
    }

    #[test]
    fn test_per_point_scores_capped_at_one() {
        let keyboard = TestKeyboard::qwerty();
        // Slow sweep through the middle row collects several near keys.
        let xs: Vec<i32> = (0..20).map(|i| 60 + i * 25).collect();
        let ys = vec![120; 20];
        let times: Vec<i32> = (0..20).map(|i| i * 50).collect();
        let (_, features, probabilities) = run_pipeline(&keyboard, &xs, &ys, &times);

        for index in 0..probabilities.len() {
            let sum: f32 = features
                .search_key_set(index)
                .iter()
                .map(|k| {
                    let p = probabilities.probability(index, k);
                    if p <= 1.0 {
                        p
                    } else {
                        0.0
                    }
                })
                .sum();
            assert!(sum <= 1.0 + 1e-4, "point {index} sums to {sum}");
        }
    }

    #[test]
    fn test_fast_points_score_lower() {
        let keyboard = TestKeyboard::qwerty();
        let (gx, gy) = keyboard.center_of('g');
        let g_id = keyboard.key_index_of('g' as i32).unwrap();

        // Pass directly over 'g' slowly, then quickly, same path.
        let xs: Vec<i32> = (0..11).map(|i| gx - 100 + i * 20).collect();
        let ys = vec![gy; 11];
        let slow_times: Vec<i32> = (0..11).map(|i| i * 60).collect();
        let fast_times: Vec<i32> = (0..11).map(|i| i * 4).collect();

        let (slow_trace, _, slow) = run_pipeline(&keyboard, &xs, &ys, &slow_times);
        let (fast_trace, _, fast) = run_pipeline(&keyboard, &xs, &ys, &fast_times);

        let slow_over_g = (0..slow_trace.len())
            .find(|&i| slow_trace.point(i).x == gx)
            .expect("slow trace crosses g");
        let fast_over_g = (0..fast_trace.len())
            .find(|&i| fast_trace.point(i).x == gx)
            .expect("fast trace crosses g");

        let p_slow = slow.probability(slow_over_g, g_id);
        let p_fast = fast.probability(fast_over_g, g_id);
        assert!(p_slow <= 1.0 && p_fast <= 1.0);
        assert!(
            p_fast < p_slow,
            "fast pass-through must score lower: {p_fast} vs {p_slow}"
        );
    }

    #[test]
    fn test_abstention_keeps_string_alive() {
        let keyboard = TestKeyboard::qwerty();
        // Start on 'a', then leave the keyboard entirely (far below).
        let (ax, ay) = keyboard.center_of('a');
        let xs = [ax, ax, ax + 40, ax + 80];
        let ys = [ay, ay + 400, ay + 400, ay + 400];
        let times = [0, 50, 100, 150];
        let (_, _, probabilities) = run_pipeline(&keyboard, &xs, &ys, &times);

        let (codes, p) = probabilities.most_probable_string();
        assert!(!codes.is_empty(), "off-keyboard points must abstain, not erase");
        assert_eq!(codes[0], 'a' as i32);
        assert!(p > 0.0);
    }

    #[test]
    fn test_most_probable_string_capped_at_max_word_length() {
        let keyboard = TestKeyboard::qwerty();
        // Three slow passes across the middle row: far more sampled points
        // than the word-length cap.
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let mut times = Vec::new();
        let mut t = 0;
        for pass in 0..3 {
            for i in 0..30 {
                let step = i * 18;
                xs.push(if pass % 2 == 0 { 40 + step } else { 580 - step });
                ys.push(120);
                times.push(t);
                t += 40;
            }
        }
        let (trace, _, probabilities) = run_pipeline(&keyboard, &xs, &ys, &times);

        assert!(trace.len() > MAX_WORD_LENGTH);
        let (codes, _) = probabilities.most_probable_string();
        assert!(codes.len() <= MAX_WORD_LENGTH);
        assert_eq!(codes.len(), MAX_WORD_LENGTH);
    }
}
