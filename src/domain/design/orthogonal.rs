//! Deterministic fallback question generation from a fixed orthogonal
//! array.

use crate::domain::criteria::{CriteriaSet, Profile};

/// The L9 orthogonal array: 9 rows over 3 factors x 3 levels, balanced so
/// each level appears three times per factor.
const L9_ROWS: [[usize; 3]; 9] = [
    [0, 0, 0],
    [0, 1, 1],
    [0, 2, 2],
    [1, 0, 1],
    [1, 1, 2],
    [1, 2, 0],
    [2, 0, 2],
    [2, 1, 0],
    [2, 2, 1],
];

/// Fixed row-index pairs served in rotation.
const PAIR_INDICES: [(usize, usize); 9] = [
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 8),
    (0, 7),
    (1, 3),
    (2, 5),
    (4, 8),
    (6, 0),
];

/// Rotating generator over the predefined orthogonal pairs. Stateless
/// except for the counter; cycles with period 9 and covers all 9 array
/// rows across 9 consecutive calls.
#[derive(Debug, Clone, Default)]
pub struct OrthogonalDesign {
    counter: usize,
}

impl OrthogonalDesign {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next predefined pair. The 3x3 shape is guaranteed by
    /// `CriteriaSet`, so row indices always resolve.
    pub fn next_pair(&mut self, set: &CriteriaSet) -> (Profile, Profile) {
        let (row_a, row_b) = PAIR_INDICES[self.counter % PAIR_INDICES.len()];
        self.counter += 1;
        (
            profile_from_row(set, &L9_ROWS[row_a]),
            profile_from_row(set, &L9_ROWS[row_b]),
        )
    }

    /// Number of pairs served so far.
    pub fn pairs_served(&self) -> usize {
        self.counter
    }
}

fn profile_from_row(set: &CriteriaSet, row: &[usize; 3]) -> Profile {
    // Infallible: L9 rows index 3 criteria x 3 levels, which CriteriaSet
    // guarantees.
    set.profile_from_indices(row)
        .unwrap_or_else(|e| unreachable!("L9 row invalid for validated criteria set: {e}"))
}
