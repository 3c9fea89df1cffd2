//! Round generator.
//!
//! Draws both scores independently and uniformly from 0..=9. The random
//! source is injected so tests can seed a deterministic generator; the
//! round itself is a pure function of that source.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::types::RoundOutcome;

pub struct RoundGenerator {
    // Send + Sync so a session can sit behind Arc<RwLock<_>>.
    rng: Box<dyn RngCore + Send + Sync>,
}

impl RoundGenerator {
    /// Generator backed by an OS-entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Generator backed by an arbitrary random source.
    pub fn with_rng(rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Produce one simulated round.
    pub fn generate(&mut self) -> RoundOutcome {
        let player = self.rng.gen_range(0..=9);
        let banker = self.rng.gen_range(0..=9);
        RoundOutcome::new(player, banker)
    }
}

impl Default for RoundGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Winner;

    #[test]
    fn test_scores_in_range() {
        let mut gen = RoundGenerator::with_seed(1);
        for _ in 0..1000 {
            let r = gen.generate();
            assert!(r.player_score <= 9);
            assert!(r.banker_score <= 9);
        }
    }

    #[test]
    fn test_winner_consistent_with_scores() {
        let mut gen = RoundGenerator::with_seed(2);
        for _ in 0..1000 {
            let r = gen.generate();
            match r.winner {
                Winner::Player => assert!(r.player_score > r.banker_score),
                Winner::Banker => assert!(r.banker_score > r.player_score),
                Winner::Tie => assert_eq!(r.player_score, r.banker_score),
            }
        }
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let mut a = RoundGenerator::with_seed(42);
        let mut b = RoundGenerator::with_seed(42);
        for _ in 0..100 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn test_all_outcomes_eventually_appear() {
        let mut gen = RoundGenerator::with_seed(7);
        let mut player = false;
        let mut banker = false;
        let mut tie = false;
        for _ in 0..2000 {
            match gen.generate().winner {
                Winner::Player => player = true,
                Winner::Banker => banker = true,
                Winner::Tie => tie = true,
            }
        }
        assert!(player && banker && tie);
    }
}
