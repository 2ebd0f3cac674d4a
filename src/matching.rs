//! Single-character proximity matching.
//!
//! For discrete-key input, every input position gets one immutable
//! [`ProximityRow`] built at initialization: slot 0 is the code point the
//! user actually produced, followed by the near-proximity code points, a
//! delimiter, the additional (weaker) proximity code points, and a
//! zero-filled tail.
//!
//! [`classify`] is the oracle the downstream search consults per
//! (position, dictionary character) pair. It is state-free and idempotent;
//! the tiered outcome lets the search grade its edit-distance penalties.
//! Accented/base-form equivalence is free throughout: both the raw and the
//! folded form of the candidate are matched against every slot.

use crate::chars::to_base_lower_code;
use crate::geometry::KeyboardGeometry;
use crate::types::{
    ProximityMatch, ADDITIONAL_PROXIMITY_DELIMITER, MAX_PROXIMITY_CHARS_SIZE, NOT_A_CODE_POINT,
};

/// Fixed-capacity, delimiter-segmented code point row for one input
/// position. Built once, immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityRow {
    codes: [i32; MAX_PROXIMITY_CHARS_SIZE],
}

impl ProximityRow {
    /// A row containing only the primary code point.
    pub fn from_primary(code_point: i32) -> Self {
        let mut codes = [NOT_A_CODE_POINT; MAX_PROXIMITY_CHARS_SIZE];
        codes[0] = code_point;
        Self { codes }
    }

    /// Build the row for one discrete key press from the geometry's
    /// precomputed proximity lists. Near codes fill first; the additional
    /// region is only appended when there is room for the delimiter and at
    /// least one code.
    pub fn build<G: KeyboardGeometry + ?Sized>(geometry: &G, code_point: i32) -> Self {
        let mut row = Self::from_primary(code_point);
        let mut slot = 1;

        for &near in geometry.near_key_code_points(code_point) {
            if slot >= MAX_PROXIMITY_CHARS_SIZE {
                return row;
            }
            if near != code_point {
                row.codes[slot] = near;
                slot += 1;
            }
        }

        let additional = geometry.additional_proximity_code_points(code_point);
        if !additional.is_empty() && slot + 1 < MAX_PROXIMITY_CHARS_SIZE {
            row.codes[slot] = ADDITIONAL_PROXIMITY_DELIMITER;
            slot += 1;
            for &code in additional {
                if slot >= MAX_PROXIMITY_CHARS_SIZE {
                    break;
                }
                row.codes[slot] = code;
                slot += 1;
            }
        }
        row
    }

    /// Raw slot contents, for tests and diagnostics.
    #[cfg(test)]
    pub fn codes(&self) -> &[i32; MAX_PROXIMITY_CHARS_SIZE] {
        &self.codes
    }

    /// The code point actually produced at this position.
    pub fn primary(&self) -> i32 {
        self.codes[0]
    }

    /// Code point in an arbitrary slot. Delimiter and zero-filled slots
    /// come back as-is; callers filter by code point validity.
    pub fn slot(&self, slot: usize) -> i32 {
        debug_assert!(slot < MAX_PROXIMITY_CHARS_SIZE, "slot {slot} out of range");
        self.codes[slot]
    }
}

#[cfg(test)]
impl ProximityRow {
    /// Assemble a row from explicit slot values (zero-filled tail).
    pub fn from_slots(slots: &[i32]) -> Self {
        assert!(slots.len() <= MAX_PROXIMITY_CHARS_SIZE);
        let mut codes = [NOT_A_CODE_POINT; MAX_PROXIMITY_CHARS_SIZE];
        codes[..slots.len()].copy_from_slice(slots);
        Self { codes }
    }
}

/// Classify a dictionary code point against one input position's row.
///
/// Order of evaluation:
/// 1. raw or folded equality with slot 0 — `Equivalent`;
/// 2. with `check_proximity` false, anything else is `Unrelated`;
/// 3. slot 0 folding to the candidate's folded form (a pure accent/case
///    difference) — `Near` without a slot;
/// 4. a match in the near region — `Near` with the slot index;
/// 5. a match past the delimiter — `AdditionalNear` with the slot index;
/// 6. otherwise `Unrelated`.
pub fn classify(row: &ProximityRow, code_point: i32, check_proximity: bool) -> ProximityMatch {
    let first = row.codes[0];
    let folded = to_base_lower_code(code_point);

    if first == folded || first == code_point {
        return ProximityMatch::Equivalent;
    }
    if !check_proximity {
        return ProximityMatch::Unrelated;
    }

    // Accented characters have no proximity list of their own; their base
    // form is close, but the base form's neighbors are not.
    if to_base_lower_code(first) == folded {
        return ProximityMatch::Near { slot: None };
    }

    let mut slot = 1;
    while slot < MAX_PROXIMITY_CHARS_SIZE && row.codes[slot] > ADDITIONAL_PROXIMITY_DELIMITER {
        if row.codes[slot] == folded || row.codes[slot] == code_point {
            return ProximityMatch::Near { slot: Some(slot) };
        }
        slot += 1;
    }

    if slot < MAX_PROXIMITY_CHARS_SIZE && row.codes[slot] == ADDITIONAL_PROXIMITY_DELIMITER {
        slot += 1;
        while slot < MAX_PROXIMITY_CHARS_SIZE && row.codes[slot] > ADDITIONAL_PROXIMITY_DELIMITER {
            if row.codes[slot] == folded || row.codes[slot] == code_point {
                return ProximityMatch::AdditionalNear { slot };
            }
            slot += 1;
        }
    }

    ProximityMatch::Unrelated
}
