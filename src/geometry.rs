//! Keyboard geometry provider contract and pure geometric math.
//!
//! The engine never owns keyboard layout data. It queries a read-only
//! [`KeyboardGeometry`] implementation for key centers, the most common key
//! width, code point mapping and precomputed proximity neighbor lists, and
//! derives everything else itself.
//!
//! The free functions below are the shared geometric vocabulary of the
//! sampler and feature stages: squared distances, point-to-segment
//! distances and direction angles. All of them are allocation-free.

/// Read-only description of a keyboard layout.
///
/// Implementations typically precompute their neighbor lists once at
/// layout-load time; every method here must be cheap enough to call from
/// the per-keystroke hot path.
pub trait KeyboardGeometry {
    /// Number of keys on the keyboard. Must not exceed
    /// [`crate::types::MAX_KEY_COUNT`].
    fn key_count(&self) -> usize;

    /// Center coordinates of a key, in keyboard pixels.
    fn key_center(&self, key_id: usize) -> (i32, i32);

    /// The most common key width in pixels. All engine thresholds scale by
    /// this so behavior is resolution-independent.
    fn most_common_key_width(&self) -> i32;

    /// Key id for a code point, if the code point is on the keyboard.
    fn key_index_of(&self, code_point: i32) -> Option<usize>;

    /// Code point produced by a key.
    fn code_point_of(&self, key_id: usize) -> i32;

    /// Whether fine-grained touch-position correction data exists for this
    /// layout. Gates the normalized squared distance table in discrete-key
    /// mode.
    fn has_touch_position_correction_data(&self) -> bool {
        false
    }

    /// Precomputed near-proximity code points for a key's code point,
    /// excluding the code point itself.
    fn near_key_code_points(&self, code_point: i32) -> &[i32];

    /// Additional, weaker proximity code points (e.g. accent variants or
    /// extended neighbor rings) for a key's code point.
    fn additional_proximity_code_points(&self, _code_point: i32) -> &[i32] {
        &[]
    }
}

/// Squared Euclidean distance between two integer points.
pub fn squared_distance(x0: i32, y0: i32, x1: i32, y1: i32) -> f32 {
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    dx * dx + dy * dy
}

/// Angle of the straight line from (x0, y0) to (x1, y1), in radians.
pub fn direction(x0: i32, y0: i32, x1: i32, y1: i32) -> f32 {
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    dy.atan2(dx)
}

/// Absolute difference between two angles, folded into [0, PI].
pub fn angle_diff(a0: f32, a1: f32) -> f32 {
    let two_pi = 2.0 * std::f32::consts::PI;
    let mut diff = (a0 - a1).abs() % two_pi;
    if diff > std::f32::consts::PI {
        diff = two_pi - diff;
    }
    diff
}

/// Squared distance from point (px, py) to the segment (x0, y0)-(x1, y1).
///
/// With `extend` set, the segment is treated as an infinite line: the
/// projection is not clamped to the endpoints. Used when the caller wants
/// the distance to a stroke direction rather than to the stroke itself.
pub fn point_to_segment_squared_distance(
    px: i32,
    py: i32,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    extend: bool,
) -> f32 {
    let seg_len_sq = squared_distance(x0, y0, x1, y1);
    if seg_len_sq <= f32::EPSILON {
        return squared_distance(px, py, x0, y0);
    }
    let vx = (x1 - x0) as f32;
    let vy = (y1 - y0) as f32;
    let wx = (px - x0) as f32;
    let wy = (py - y0) as f32;
    let mut t = (wx * vx + wy * vy) / seg_len_sq;
    if !extend {
        t = t.clamp(0.0, 1.0);
    }
    let proj_x = x0 as f32 + t * vx;
    let proj_y = y0 as f32 + t * vy;
    let dx = px as f32 - proj_x;
    let dy = py as f32 - proj_y;
    dx * dx + dy * dy
}
