//! Geometric feature extraction over the sampled trace.
//!
//! For every sampled point this stage derives:
//! - a full row of squared point-to-key distances (cached, append-only),
//! - the near key set (keys within a closeness threshold),
//! - the search key set (near keys still plausible given local speed),
//! - a normalized local speed rate and a direction angle,
//! - a beeline speed percentile discounting fast pass-through segments.
//!
//! All distances are normalized by the keyboard's most common key width so
//! thresholds are resolution-independent. Rows for points before the
//! continuation trim point are never recomputed: the cache only grows.

use log::trace;

use crate::geometry::{self, KeyboardGeometry};
use crate::sampler::SampledTrace;
use crate::types::KeySet;

/// Tuning for the geometric feature stage.
///
/// Ratios are in units of the most common key width.
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// A key is "near" a point if its center is within this many key
    /// widths of the point.
    pub near_key_threshold_ratio: f32,

    /// Trailing time window for the local speed estimate.
    pub speed_window_ms: i32,

    /// Path-length lookaround (in key widths) when picking the two anchor
    /// points of the beeline comparison.
    pub beeline_distance_ratio: f32,

    /// Beeline speed at which the percentile saturates at 1.0, as a
    /// multiple of the trace's average speed.
    pub beeline_speed_cap_ratio: f32,

    /// How much the search radius shrinks at high local speed. At a speed
    /// rate of 2.0 or more the near radius is multiplied by
    /// `1.0 - search_speed_shrink`.
    pub search_speed_shrink: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            near_key_threshold_ratio: 1.2,
            speed_window_ms: 100,
            beeline_distance_ratio: 1.0,
            beeline_speed_cap_ratio: 2.0,
            search_speed_shrink: 0.5,
        }
    }
}

/// Per-point geometric features, parallel to the sampled trace.
///
/// Owned by the session; rebuilt incrementally from the first
/// newly-committed point on each update.
#[derive(Debug, Default)]
pub struct TraceFeatures {
    key_count: usize,
    /// Row-major squared normalized distances, `len = points × key_count`.
    distance_cache: Vec<f32>,
    near_key_sets: Vec<KeySet>,
    search_key_sets: Vec<KeySet>,
    /// Local speed, 1.0 ≈ one key width per 100 ms.
    speed_rates: Vec<f32>,
    /// Direction angle toward the next sampled point (radians).
    directions: Vec<f32>,
    /// 0.0 = dwell/curve, 1.0 = fast straight pass-through.
    beeline_percentiles: Vec<f32>,
    /// Trace average speed in pixels per millisecond.
    average_speed: f32,
}

impl TraceFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.distance_cache.clear();
        self.near_key_sets.clear();
        self.search_key_sets.clear();
        self.speed_rates.clear();
        self.directions.clear();
        self.beeline_percentiles.clear();
        self.average_speed = 0.0;
    }

    /// Recompute features for every point at index >= `last_saved`.
    /// Points before `last_saved` are frozen and keep their rows verbatim.
    pub fn update<G: KeyboardGeometry + ?Sized>(
        &mut self,
        geometry: &G,
        trace: &SampledTrace,
        last_saved: usize,
        is_gesture: bool,
        config: &FeatureConfig,
    ) {
        self.key_count = geometry.key_count();
        self.truncate_to(last_saved);
        if trace.is_empty() {
            self.average_speed = 0.0;
            return;
        }

        if is_gesture {
            self.refresh_speed_and_directions(trace, last_saved, geometry, config);
            self.refresh_beeline_percentiles(trace, last_saved, geometry, config);
        } else {
            // Discrete taps carry no useful kinematics.
            for _ in last_saved..trace.len() {
                self.speed_rates.push(0.0);
                self.directions.push(0.0);
                self.beeline_percentiles.push(0.0);
            }
        }

        self.init_distance_infos(geometry, trace, last_saved, config);
        self.update_search_key_sets(last_saved, is_gesture, config);
        trace!(
            "features: {} rows ({} reused), average speed {:.3} px/ms",
            trace.len(),
            last_saved,
            self.average_speed
        );
    }

    fn truncate_to(&mut self, last_saved: usize) {
        self.distance_cache.truncate(last_saved * self.key_count);
        self.near_key_sets.truncate(last_saved);
        self.search_key_sets.truncate(last_saved);
        self.speed_rates.truncate(last_saved);
        self.directions.truncate(last_saved);
        self.beeline_percentiles.truncate(last_saved);
    }

    fn refresh_speed_and_directions<G: KeyboardGeometry + ?Sized>(
        &mut self,
        trace: &SampledTrace,
        last_saved: usize,
        geometry: &G,
        config: &FeatureConfig,
    ) {
        let n = trace.len();
        let key_width = geometry.most_common_key_width() as f32;

        let duration = (trace.point(n - 1).time - trace.point(0).time) as f32;
        self.average_speed = if duration > 0.0 {
            trace.total_length() / duration
        } else {
            0.0
        };

        for i in last_saved..n {
            let t_i = trace.point(i).time;
            let mut j = i;
            while j > 0 && t_i - trace.point(j - 1).time <= config.speed_window_ms {
                j -= 1;
            }
            if j == i && i > 0 {
                // Nothing inside the window (a pause): fall back to the
                // immediate predecessor so the rate reflects the dwell.
                j = i - 1;
            }
            let elapsed = (t_i - trace.point(j).time) as f32;
            let px_per_ms = if elapsed > 0.0 {
                trace.path_length_between(j, i) / elapsed
            } else {
                0.0
            };
            self.speed_rates.push(px_per_ms * 100.0 / key_width);

            let direction = if i + 1 < n {
                let (a, b) = (trace.point(i), trace.point(i + 1));
                geometry::direction(a.x, a.y, b.x, b.y)
            } else if i > 0 {
                let (a, b) = (trace.point(i - 1), trace.point(i));
                geometry::direction(a.x, a.y, b.x, b.y)
            } else {
                0.0
            };
            self.directions.push(direction);
        }
    }

    fn refresh_beeline_percentiles<G: KeyboardGeometry + ?Sized>(
        &mut self,
        trace: &SampledTrace,
        last_saved: usize,
        geometry: &G,
        config: &FeatureConfig,
    ) {
        let n = trace.len();
        let radius = geometry.most_common_key_width() as f32 * config.beeline_distance_ratio;

        for i in last_saved..n {
            let mut j = i;
            while j > 0 && trace.path_length_between(j - 1, i) < radius {
                j -= 1;
            }
            let mut k = i;
            while k + 1 < n && trace.path_length_between(i, k + 1) < radius {
                k += 1;
            }

            let elapsed = (trace.point(k).time - trace.point(j).time) as f32;
            let percentile = if j == k || elapsed <= 0.0 || self.average_speed <= 0.0 {
                0.0
            } else {
                let beeline = trace.point(j).distance_to(trace.point(k)) / elapsed;
                (beeline / (config.beeline_speed_cap_ratio * self.average_speed)).clamp(0.0, 1.0)
            };
            self.beeline_percentiles.push(percentile);
        }
    }

    fn init_distance_infos<G: KeyboardGeometry + ?Sized>(
        &mut self,
        geometry: &G,
        trace: &SampledTrace,
        last_saved: usize,
        config: &FeatureConfig,
    ) {
        let key_width_sq = {
            let w = geometry.most_common_key_width() as f32;
            w * w
        };
        let near_threshold_sq = config.near_key_threshold_ratio * config.near_key_threshold_ratio;

        for i in last_saved..trace.len() {
            let point = trace.point(i);
            let mut near = KeySet::new();
            for key_id in 0..self.key_count {
                let (kx, ky) = geometry.key_center(key_id);
                let d_sq = geometry::squared_distance(point.x, point.y, kx, ky) / key_width_sq;
                self.distance_cache.push(d_sq);
                if d_sq < near_threshold_sq {
                    near.insert(key_id);
                }
            }
            self.near_key_sets.push(near);
        }
    }

    fn update_search_key_sets(&mut self, last_saved: usize, is_gesture: bool, config: &FeatureConfig) {
        for i in last_saved..self.near_key_sets.len() {
            let near = self.near_key_sets[i];
            let search = if !is_gesture {
                near
            } else {
                // Fast segments shrink the plausible radius: keys the path
                // could not have paused on drop out of the search set.
                let overspeed = (self.speed_rates[i] - 1.0).clamp(0.0, 1.0);
                let radius = config.near_key_threshold_ratio
                    * (1.0 - config.search_speed_shrink * overspeed);
                let radius_sq = radius * radius;
                let mut set = KeySet::new();
                for key_id in near.iter() {
                    if self.distance_cache[i * self.key_count + key_id] < radius_sq {
                        set.insert(key_id);
                    }
                }
                set
            };
            self.search_key_sets.push(search);
        }
    }

    /// Number of feature rows (always equal to the sampled point count).
    pub fn len(&self) -> usize {
        self.near_key_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.near_key_sets.is_empty()
    }

    /// Squared distance from a sampled point to a key, in key widths².
    pub fn squared_distance_to_key(&self, index: usize, key_id: usize) -> f32 {
        debug_assert!(index < self.len(), "feature index {index} out of range");
        debug_assert!(key_id < self.key_count, "key id {key_id} out of range");
        self.distance_cache[index * self.key_count + key_id]
    }

    /// Linear distance from a sampled point to a key, in key widths.
    pub fn distance_to_key(&self, index: usize, key_id: usize) -> f32 {
        self.squared_distance_to_key(index, key_id).sqrt()
    }

    pub fn near_key_set(&self, index: usize) -> &KeySet {
        debug_assert!(index < self.len());
        &self.near_key_sets[index]
    }

    pub fn search_key_set(&self, index: usize) -> &KeySet {
        debug_assert!(index < self.len());
        &self.search_key_sets[index]
    }

    pub fn speed_rate(&self, index: usize) -> f32 {
        debug_assert!(index < self.len());
        self.speed_rates[index]
    }

    pub fn direction(&self, index: usize) -> f32 {
        debug_assert!(index < self.len());
        self.directions[index]
    }

    pub fn beeline_percentile(&self, index: usize) -> f32 {
        debug_assert!(index < self.len());
        self.beeline_percentiles[index]
    }

    /// Average trace speed in pixels per millisecond.
    pub fn average_speed(&self) -> f32 {
        self.average_speed
    }
}
