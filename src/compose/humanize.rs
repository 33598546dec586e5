//! Humanization: Gaussian jitter on onsets and durations.

use rand::Rng;

use crate::config::HumanizeConfig;
use crate::event::{Note, Tempo};
use crate::sampling::gaussian;

/// Jitter every note in place and return the standard deviation used (beats).
///
/// One σ is drawn per call: `sqrt(Uniform[0, max_variance)) / (bpm / 60)`.
/// Onsets are floored at 0 and durations at `min_duration_beats`. The list
/// is not re-sorted, so close neighbours may swap order.
pub fn humanize(
    notes: &mut [Note],
    tempo: Tempo,
    config: &HumanizeConfig,
    rng: &mut impl Rng,
) -> f64 {
    let variance = rng.gen::<f64>() * config.max_variance;
    let sigma = variance.sqrt() / tempo.beats_per_second();
    for note in notes.iter_mut() {
        note.time = gaussian(note.time, sigma, rng).max(0.0);
        note.duration = gaussian(note.duration, sigma, rng).max(config.min_duration_beats);
    }
    sigma
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn notes() -> Vec<Note> {
        (0..32)
            .map(|i| Note::new(i as f64 * 0.25, 0.15, 60 + (i % 12) as u8, 90))
            .collect()
    }

    #[test]
    fn floors_hold() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = HumanizeConfig::default();
        for _ in 0..100 {
            let mut n = notes();
            humanize(&mut n, Tempo::new(40.0).unwrap(), &config, &mut rng);
            assert!(n.iter().all(|n| n.time >= 0.0 && n.duration >= 0.1));
        }
    }

    #[test]
    fn sigma_scales_with_tempo() {
        let config = HumanizeConfig::default();
        let slow = humanize(
            &mut notes(),
            Tempo::new(60.0).unwrap(),
            &config,
            &mut ChaCha8Rng::seed_from_u64(2),
        );
        let fast = humanize(
            &mut notes(),
            Tempo::new(120.0).unwrap(),
            &config,
            &mut ChaCha8Rng::seed_from_u64(2),
        );
        assert!((slow - 2.0 * fast).abs() < 1e-12);
        assert!(slow <= config.max_variance.sqrt());
    }

    #[test]
    fn zero_variance_leaves_notes_alone() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let config = HumanizeConfig {
            max_variance: 0.0,
            ..HumanizeConfig::default()
        };
        let original = notes();
        let mut n = original.clone();
        let sigma = humanize(&mut n, Tempo::new(120.0).unwrap(), &config, &mut rng);
        assert_eq!(sigma, 0.0);
        for (a, b) in original.iter().zip(&n) {
            assert_eq!(a.time, b.time);
            assert_eq!(b.duration, 0.15);
            assert_eq!(a.key, b.key);
        }
    }

    #[test]
    fn keys_and_velocities_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let original = notes();
        let mut n = original.clone();
        humanize(&mut n, Tempo::new(100.0).unwrap(), &HumanizeConfig::default(), &mut rng);
        for (a, b) in original.iter().zip(&n) {
            assert_eq!(a.key, b.key);
            assert_eq!(a.velocity, b.velocity);
        }
    }
}
