//! Per-frame camera jitter.
//!
//! Every drawn frame moves the eye to a fresh depth. The source of that
//! depth is injected so tests can pin it.

use rand::Rng;

pub trait EyeJitter {
    /// Eye Z for the next frame, in [-1, 0).
    fn eye_z(&mut self) -> f32;
}

/// Uniformly random eye Z drawn from `rng`.
pub struct RandomJitter<R> {
    rng: R,
}

impl<R: Rng> RandomJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> EyeJitter for RandomJitter<R> {
    fn eye_z(&mut self) -> f32 {
        // [0, 1) -> [-1, 0)
        -1.0 + self.rng.random::<f32>()
    }
}

/// Always the same eye Z.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f32);

impl EyeJitter for FixedJitter {
    fn eye_z(&mut self) -> f32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_jitter_stays_in_range() {
        let mut jitter = RandomJitter::new(StdRng::seed_from_u64(7));
        for _ in 0..1000 {
            let z = jitter.eye_z();
            assert!((-1.0..0.0).contains(&z), "{z} out of range");
        }
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let mut a = RandomJitter::new(StdRng::seed_from_u64(42));
        let mut b = RandomJitter::new(StdRng::seed_from_u64(42));
        for _ in 0..16 {
            assert_eq!(a.eye_z(), b.eye_z());
        }
    }

    #[test]
    fn fixed_jitter_never_moves() {
        let mut jitter = FixedJitter(-0.75);
        assert_eq!(jitter.eye_z(), -0.75);
        assert_eq!(jitter.eye_z(), -0.75);
    }
}
