//! Deterministic RNG for route sampling.
//!
//! Generation itself never draws random numbers.  Consumers that sample
//! paths from a route table (engine insertion, test harnesses) get a
//! reproducible stream per entry edge:
//!
//!   seed = global_seed XOR (edge_id * MIXING_CONSTANT)
//!
//! so adding entry edges never disturbs the streams of existing ones.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::EdgeId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded RNG wrapper used with `RouteTable::sample`.
pub struct RouteRng(SmallRng);

impl RouteRng {
    pub fn new(seed: u64) -> Self {
        RouteRng(SmallRng::seed_from_u64(seed))
    }

    /// Independent stream for one entry edge.
    pub fn for_edge(global_seed: u64, edge: EdgeId) -> Self {
        let seed = global_seed ^ (edge.0 as u64).wrapping_mul(MIXING_CONSTANT);
        RouteRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}
