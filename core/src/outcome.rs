//! Random draws shared by the match simulator and the event generator.
//!
//! Nothing here holds state; every function draws from the `Rng` it is handed, so a
//! seeded `StdRng` makes a whole simulation reproducible.

use std::ops::Range;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::ValidationError;

/// Knuth's multiplication method. Returns 0 for a non-positive or non-finite mean.
pub fn poisson_sample<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u32 {
    if !lambda.is_finite() || lambda <= 0.0 {
        return 0;
    }
    let limit = (-lambda).exp();
    let mut product = 1.0;
    let mut draws = 0u32;
    loop {
        draws += 1;
        product *= rng.gen_range(0.0..1.0);
        if product <= limit {
            return draws - 1;
        }
    }
}

pub fn uniform_pick<'a, R: Rng + ?Sized, T>(
    rng: &mut R,
    candidates: &'a [T],
) -> Result<&'a T, ValidationError> {
    candidates.choose(rng).ok_or(ValidationError::EmptyInput)
}

/// Probabilities outside [0, 1] are clamped; a non-finite one never fires.
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if !probability.is_finite() {
        return false;
    }
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

/// Uniform draw from a half-open range; an empty or non-finite range yields its start.
pub fn uniform_range<R: Rng + ?Sized>(rng: &mut R, range: Range<f64>) -> f64 {
    if !(range.start.is_finite() && range.end.is_finite()) || range.start >= range.end {
        return range.start;
    }
    rng.gen_range(range)
}

pub fn uniform_int<R: Rng + ?Sized>(rng: &mut R, range: Range<u32>) -> u32 {
    if range.start >= range.end {
        return range.start;
    }
    rng.gen_range(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn poisson_with_zero_mean_is_always_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            assert_eq!(poisson_sample(&mut rng, 0.0), 0);
        }
    }

    #[test]
    fn poisson_mean_tracks_lambda() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = 20_000;
        let total: u64 = (0..samples)
            .map(|_| poisson_sample(&mut rng, 2.5) as u64)
            .sum();
        let mean = total as f64 / samples as f64;
        assert!((mean - 2.5).abs() < 0.1, "mean was {mean}");
    }

    #[test]
    fn poisson_rejects_invalid_means() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(poisson_sample(&mut rng, -1.0), 0);
        assert_eq!(poisson_sample(&mut rng, f64::NAN), 0);
    }

    #[test]
    fn uniform_pick_fails_on_empty_input() {
        let mut rng = StdRng::seed_from_u64(4);
        let empty: [u8; 0] = [];
        assert_eq!(
            uniform_pick(&mut rng, &empty),
            Err(ValidationError::EmptyInput)
        );
    }

    #[test]
    fn uniform_pick_reaches_every_candidate() {
        let mut rng = StdRng::seed_from_u64(5);
        let candidates = ["a", "b", "c"];
        let mut seen = [false; 3];
        for _ in 0..200 {
            let picked = uniform_pick(&mut rng, &candidates).unwrap();
            let idx = candidates.iter().position(|c| c == picked).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn uniform_range_stays_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..500 {
            let value = uniform_range(&mut rng, -1.0..1.0);
            assert!((-1.0..1.0).contains(&value));
        }
        assert_eq!(uniform_range(&mut rng, 3.0..3.0), 3.0);
        assert_eq!(uniform_int(&mut rng, 5..5), 5);
        assert_eq!(uniform_range(&mut rng, 0.0..f64::INFINITY), 0.0);
    }

    #[test]
    fn bernoulli_handles_degenerate_probabilities() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            assert!(!bernoulli(&mut rng, f64::NAN));
            assert!(!bernoulli(&mut rng, f64::INFINITY));
            assert!(!bernoulli(&mut rng, -0.5));
            assert!(bernoulli(&mut rng, 1.5));
        }
    }
}
