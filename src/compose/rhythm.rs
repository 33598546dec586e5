//! Duration distributions, one per hand per measure.

use rand::Rng;

use crate::error::Result;
use crate::event::TimeSignature;
use crate::sampling::{gaussian, select_element};

/// Candidate note values, shortest first (1.0 = whole note).
pub const DURATION_VALUES: [f64; 7] = [
    1.0 / 32.0,
    1.0 / 16.0,
    1.0 / 8.0,
    1.0 / 4.0,
    1.0 / 2.0,
    1.0,
    2.0,
];

const MEAN_CENTER: f64 = 0.5;
const MEAN_STD_DEV: f64 = 0.6;
const SPREAD_FACTOR: f64 = 0.35;

/// A probability vector over [`DURATION_VALUES`].
///
/// Weights form a Gaussian bump around a randomly placed mean, so one
/// measure may favour long held notes and the next a dense run.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationDistribution {
    mean: f64,
    weights: [f64; 7],
}

impl DurationDistribution {
    /// Build the bump around `mean`, clamped into the candidate range.
    pub fn from_mean(mean: f64) -> Self {
        let (lo, hi) = (DURATION_VALUES[0], DURATION_VALUES[DURATION_VALUES.len() - 1]);
        let mean = if mean.is_finite() { mean.clamp(lo, hi) } else { MEAN_CENTER };
        let spread = SPREAD_FACTOR * mean;

        let mut weights = DURATION_VALUES.map(|v| (-0.5 * ((v - mean) / spread).powi(2)).exp());
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Self { mean, weights }
    }

    /// Draw a fresh distribution.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::from_mean(gaussian(MEAN_CENTER, MEAN_STD_DEV, rng))
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn weights(&self) -> &[f64; 7] {
        &self.weights
    }

    /// Draw a note value (fraction of a whole note).
    pub fn sample_value(&self, rng: &mut impl Rng) -> Result<f64> {
        select_element(&DURATION_VALUES, &self.weights, rng).copied()
    }

    /// Draw a duration and convert it to beats under `time_signature`.
    pub fn sample_beats(&self, time_signature: &TimeSignature, rng: &mut impl Rng) -> Result<f64> {
        Ok(time_signature.note_value_to_beats(self.sample_value(rng)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn weights_are_normalized() {
        for mean in [1.0 / 32.0, 0.1, 0.5, 1.3, 2.0] {
            let d = DurationDistribution::from_mean(mean);
            assert_approx_eq!(d.weights().iter().sum::<f64>(), 1.0, 1e-9);
            assert!(d.weights().iter().all(|w| *w >= 0.0));
        }
    }

    #[test]
    fn mean_is_clamped() {
        assert_approx_eq!(DurationDistribution::from_mean(-3.0).mean(), 1.0 / 32.0);
        assert_approx_eq!(DurationDistribution::from_mean(9.0).mean(), 2.0);
    }

    #[test]
    fn peak_sits_on_nearest_value() {
        let d = DurationDistribution::from_mean(0.25);
        let (peak, _) = d
            .weights()
            .iter()
            .enumerate()
            .fold((0, 0.0), |best, (i, w)| if *w > best.1 { (i, *w) } else { best });
        assert_eq!(DURATION_VALUES[peak], 0.25);
    }

    #[test]
    fn short_mean_favours_short_notes() {
        let d = DurationDistribution::from_mean(1.0 / 32.0);
        assert!(d.weights()[0] > 0.9);
        assert!(d.weights()[6] < 1e-12);
    }

    #[test]
    fn samples_come_from_candidates() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let ts = TimeSignature::default();
        for _ in 0..200 {
            let d = DurationDistribution::random(&mut rng);
            let beats = d.sample_beats(&ts, &mut rng).unwrap();
            assert!(DURATION_VALUES.iter().any(|v| (v * 4.0 - beats).abs() < 1e-12));
        }
    }
}
