//! Pi estimators.
//!
//! The midpoint rule integrates `4 / (1 + x^2)` over `[0, 1]` with `steps`
//! equal intervals. Backends split the interval indices, sum each block with
//! [`midpoint_sum`], combine the partial sums, and scale once by the step
//! width.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Width of one midpoint interval.
pub fn step_width(steps: usize) -> f64 {
    1.0 / steps as f64
}

/// Unscaled sum of `4 / (1 + x^2)` at the midpoints of the intervals in
/// `indices`.
pub fn midpoint_sum(indices: Range<usize>, steps: usize) -> f64 {
    let step = step_width(steps);
    let mut sum = 0.0f64;
    for i in indices {
        let x = (i as f64 + 0.5) * step;
        sum += 4.0 / (1.0 + x * x);
    }
    sum
}

/// Number of uniform points in the unit square that land inside the quarter
/// circle.
pub fn quarter_circle_hits<R: Rng>(samples: usize, rng: &mut R) -> u64 {
    let mut hits = 0u64;
    for _ in 0..samples {
        let x: f64 = rng.gen();
        let y: f64 = rng.gen();
        if x * x + y * y <= 1.0 {
            hits += 1;
        }
    }
    hits
}

/// Deterministic per-worker RNG derived from a base seed.
pub fn worker_rng(seed: u64, worker: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// `4 * hits / samples`. Zero samples yields zero.
pub fn hits_to_pi(hits: u64, samples: usize) -> f64 {
    if samples == 0 {
        return 0.0;
    }
    4.0 * hits as f64 / samples as f64
}
