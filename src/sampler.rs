use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`.
pub trait UniformSampler {
    fn next_unit(&mut self) -> f64;
}

pub struct SeededSampler {
    rng: StdRng,
}

impl SeededSampler {
    /// Reproducible when `seed` is given, otherwise seeded from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl UniformSampler for SeededSampler {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
#[cfg(test)]
pub struct FixedSampler {
    draws: Vec<f64>,
    next: usize,
}

#[cfg(test)]
impl FixedSampler {
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty());
        Self { draws, next: 0 }
    }
}

#[cfg(test)]
impl UniformSampler for FixedSampler {
    fn next_unit(&mut self) -> f64 {
        let u = self.draws[self.next % self.draws.len()];
        self.next += 1;
        u
    }
}
