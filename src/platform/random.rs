//! Uniform randomness capability
//!
//! Only the phase scheduler draws from this, to pick dwell durations.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform samples in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Seeded PCG generator (reproducible given the seed)
#[derive(Debug, Clone)]
pub struct PcgRandom {
    seed: u64,
    rng: Pcg32,
}

impl PcgRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for PcgRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Samples are clamped into `[0, 1)`; an empty script always yields 0
    pub fn new(samples: impl Into<Vec<f64>>) -> Self {
        let samples = samples
            .into()
            .into_iter()
            .map(|s| s.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { samples, cursor: 0 }
    }

    pub fn constant(sample: f64) -> Self {
        Self::new(vec![sample])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sample = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        sample
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_same_seed_same_stream() {
        let mut a = PcgRandom::new(12345);
        let mut b = PcgRandom::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn pcg_range_0_to_1() {
        let mut rng = PcgRandom::new(42);
        for _ in 0..1000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v), "value out of range: {}", v);
        }
    }

    #[test]
    fn scripted_cycles_and_clamps() {
        let mut rng = ScriptedRandom::new(vec![0.25, 1.5]);
        assert_eq!(rng.next_unit(), 0.25);
        assert!(rng.next_unit() < 1.0);
        assert_eq!(rng.next_unit(), 0.25);
    }

    #[test]
    fn empty_script_yields_zero() {
        let mut rng = ScriptedRandom::new(Vec::<f64>::new());
        assert_eq!(rng.next_unit(), 0.0);
    }
}
