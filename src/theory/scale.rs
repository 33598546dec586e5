//! Scale vocabulary.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Interval;

/// A scale, as semitone offsets from its tonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Diatonic,
    WholeTone,
    PentatonicMajor,
    PentatonicBlues,
    /// Six uniform draws in `[0, 12]`.
    Random,
}

impl Scale {
    pub const ALL: [Scale; 5] = [
        Scale::Diatonic,
        Scale::WholeTone,
        Scale::PentatonicMajor,
        Scale::PentatonicBlues,
        Scale::Random,
    ];

    pub fn intervals(self, rng: &mut impl Rng) -> Vec<Interval> {
        match self {
            Scale::Diatonic => vec![0, 2, 4, 5, 7, 9, 11, 12],
            Scale::WholeTone => vec![0, 2, 4, 6, 8, 10, 12],
            Scale::PentatonicMajor => vec![0, 2, 4, 7, 9],
            Scale::PentatonicBlues => vec![0, 2, 5, 7, 9],
            Scale::Random => (0..6).map(|_| rng.gen_range(0..=12)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn fixed_scales() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(Scale::Diatonic.intervals(&mut rng).len(), 8);
        assert_eq!(Scale::WholeTone.intervals(&mut rng), vec![0, 2, 4, 6, 8, 10, 12]);
        assert_eq!(Scale::PentatonicBlues.intervals(&mut rng), vec![0, 2, 5, 7, 9]);
    }

    #[test]
    fn random_scale_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..100 {
            let s = Scale::Random.intervals(&mut rng);
            assert_eq!(s.len(), 6);
            assert!(s.iter().all(|i| (0..=12).contains(i)));
        }
    }
}
