//! Weighted discrete sampling over a finite candidate list.

use rand::Rng;

use crate::error::{GenerationError, Result};

/// Draw one element of `elements` with `P(elements[i]) = probabilities[i]`.
///
/// `probabilities` should sum to 1. A `u ~ Uniform[0, 1)` walks the running
/// sum and the first candidate whose cumulative weight exceeds `u` wins, so
/// zero-weight candidates are never returned. If floating-point rounding
/// leaves `u` past the final sum, the last positively weighted candidate is
/// returned.
///
/// Mismatched lengths, an empty list, or negative/non-finite weights are
/// programmer errors and fail with [`GenerationError::InvalidArgument`].
pub fn select_element<'a, T>(
    elements: &'a [T],
    probabilities: &[f64],
    rng: &mut impl Rng,
) -> Result<&'a T> {
    select_index(elements.len(), probabilities, rng).map(|i| &elements[i])
}

/// Index form of [`select_element`].
pub fn select_index(len: usize, probabilities: &[f64], rng: &mut impl Rng) -> Result<usize> {
    if len != probabilities.len() {
        return Err(GenerationError::invalid(format!(
            "{len} candidates but {} weights",
            probabilities.len()
        )));
    }
    if len == 0 {
        return Err(GenerationError::invalid("cannot select from zero candidates"));
    }
    if let Some(bad) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(GenerationError::invalid(format!("weight {bad} is not a probability")));
    }

    let u: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (i, p) in probabilities.iter().enumerate() {
        cumulative += p;
        if u < cumulative {
            return Ok(i);
        }
    }

    probabilities
        .iter()
        .rposition(|p| *p > 0.0)
        .ok_or_else(|| GenerationError::invalid("all weights are zero"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn point_mass_always_wins() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let candidates = ['a', 'b', 'c'];
        for _ in 0..10_000 {
            let picked = select_element(&candidates, &[0.0, 1.0, 0.0], &mut rng).unwrap();
            assert_eq!(*picked, 'b');
        }
    }

    #[test]
    fn mismatched_lengths_fail() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let err = select_element(&[1, 2, 3], &[0.5, 0.5], &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidArgument(_)));
    }

    #[test]
    fn empty_and_negative_fail() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let empty: [u8; 0] = [];
        assert!(select_element(&empty, &[], &mut rng).is_err());
        assert!(select_element(&[1, 2], &[1.5, -0.5], &mut rng).is_err());
        assert!(select_element(&[1, 2], &[0.0, 0.0], &mut rng).is_err());
    }

    #[test]
    fn frequencies_follow_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let weights = [0.2, 0.5, 0.3];
        let mut counts = [0usize; 3];
        let n = 20_000;
        for _ in 0..n {
            counts[select_index(3, &weights, &mut rng).unwrap()] += 1;
        }
        for (count, w) in counts.iter().zip(weights) {
            let freq = *count as f64 / n as f64;
            assert!((freq - w).abs() < 0.02, "expected ~{w}, got {freq}");
        }
    }

    #[test]
    fn rounding_shortfall_falls_back_to_last_weighted() {
        // Weights summing to slightly less than 1 must still pick something.
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1_000 {
            let i = select_index(3, &[0.3, 0.3, 0.0], &mut rng).unwrap();
            assert!(i < 2);
        }
    }
}
