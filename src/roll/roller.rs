use crate::common::Int;
use rand::Rng;

/// A source of uniformly distributed integers.
pub trait Roller {
    /// Draws an integer from `low..=high`.
    fn draw_uniform(&mut self, low: Int, high: Int) -> Int;

    fn roll(&mut self, sides: Int) -> Int {
        self.draw_uniform(1, sides)
    }
}

impl<R: Rng> Roller for R {
    fn draw_uniform(&mut self, low: Int, high: Int) -> Int {
        self.gen_range(low..=high)
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;


#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_rng_draws_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for sides in [1, 2, 6, 20, 100] {
            for _ in 0..200 {
                let x = rng.roll(sides);
                assert!((1..=sides).contains(&x), "{} out of 1..={}", x, sides);
            }
        }
    }

    #[test]
    fn test_single_sided_die() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..50).all(|_| rng.roll(1) == 1));
    }
}
