use std::ops::Range;

use log::warn;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::vector::{Bounds, Vector};

/// Random draws before falling back to scanning the grid.
const MAX_SAMPLES: usize = 1024;

/// Source of candidate food cells.
pub trait CellSampler {
    fn sample(&mut self, xs: Range<i32>, ys: Range<i32>) -> Vector;
}

/// Seeded rng, so a game can be replayed from its seed.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        SessionRng { rng: StdRng::seed_from_u64(seed), seed }
    }

    pub fn from_random() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl CellSampler for SessionRng {
    fn sample(&mut self, xs: Range<i32>, ys: Range<i32>) -> Vector {
        Vector::new(self.rng.gen_range(xs), self.rng.gen_range(ys))
    }
}

/// Picks a cell with `x` in `[1, width)` and `y` in `[1, height)` that is not
/// on `body`. Returns `None` only when every such cell is taken.
pub fn place_food<S: CellSampler + ?Sized>(body: &[Vector], bounds: Bounds, sampler: &mut S) -> Option<Vector> {
    let (xs, ys) = (1..bounds.width, 1..bounds.height);
    if xs.is_empty() || ys.is_empty() {
        return None;
    }

    for _ in 0..MAX_SAMPLES {
        let pos = sampler.sample(xs.clone(), ys.clone());
        if !body.contains(&pos) {
            return Some(pos);
        }
    }

    warn!("no free cell after {} samples, scanning the grid", MAX_SAMPLES);

    ys.flat_map(|y| xs.clone().map(move |x| Vector::new(x, y)))
        .find(|pos| !body.contains(pos))
}
