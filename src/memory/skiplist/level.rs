use rand::{rngs::StdRng, Rng, SeedableRng};

/// Picks how many levels a newly inserted node joins.
pub trait LevelGenerator {
    /// Returns a level in `1..=max_level`.
    fn random_level(&mut self, max_level: usize) -> usize;
}

/// Geometric leveling: start at 1 and keep climbing while a fair coin comes
/// up heads, stopping at `max_level`.
///
/// P(level = k) is 2^-k for k < max_level, the remaining tail lands on
/// `max_level`.
pub struct CoinFlip<R> {
    rng: R,
}

impl<R: Rng> CoinFlip<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl CoinFlip<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> LevelGenerator for CoinFlip<R> {
    fn random_level(&mut self, max_level: usize) -> usize {
        let mut level = 1;
        while level < max_level && self.rng.gen_bool(0.5) {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::mock::StepRng, rngs::StdRng, SeedableRng};

    use super::{CoinFlip, LevelGenerator};

    #[test]
    fn test_level_bounds() {
        let mut leveler = CoinFlip::from_seed(0);
        for _ in 0..10_000 {
            let level = leveler.random_level(4);
            assert!((1..=4).contains(&level));
        }
        for _ in 0..100 {
            assert_eq!(leveler.random_level(1), 1);
        }
    }

    #[test]
    fn test_distribution() {
        let mut leveler = CoinFlip::new(StdRng::seed_from_u64(1234));
        let mut counts = [0usize; 17];
        for _ in 0..100_000 {
            counts[leveler.random_level(16)] += 1;
        }
        // roughly half stop at 1, a quarter at 2
        assert!((45_000..55_000).contains(&counts[1]));
        assert!((22_000..28_000).contains(&counts[2]));
        assert!(counts[1] > counts[2] && counts[2] > counts[3]);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = CoinFlip::from_seed(99);
        let mut b = CoinFlip::from_seed(99);
        let levels_a: Vec<usize> = (0..256).map(|_| a.random_level(16)).collect();
        let levels_b: Vec<usize> = (0..256).map(|_| b.random_level(16)).collect();
        assert_eq!(levels_a, levels_b);
    }

    #[test]
    fn test_tail_folds_into_max_level() {
        // a generator that never stops flipping heads
        let mut leveler = CoinFlip::new(StepRng::new(0, 0));
        assert_eq!(leveler.random_level(5), 5);
    }
}
