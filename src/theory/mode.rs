//! Church modes expressed as interval substitutions over a major scale.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Interval;

/// A diatonic mode, relative to the ionian (major) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// `(from, to)` pairs: every interval equal to `from` becomes `to`.
    pub fn replacements(self) -> &'static [(Interval, Interval)] {
        match self {
            Mode::Ionian => &[],
            Mode::Dorian => &[(4, 3), (11, 10)],
            Mode::Phrygian => &[(2, 1), (4, 3), (9, 8), (11, 10)],
            Mode::Lydian => &[(5, 6)],
            Mode::Mixolydian => &[(11, 10)],
            Mode::Aeolian => &[(5, 4), (9, 8), (11, 10)],
            Mode::Locrian => &[(2, 1), (4, 3), (7, 6), (9, 8), (11, 10)],
        }
    }

    /// Replace matching intervals; everything else passes through.
    pub fn apply(self, intervals: &[Interval]) -> Vec<Interval> {
        let table = self.replacements();
        intervals
            .iter()
            .map(|&i| {
                table
                    .iter()
                    .find(|(from, _)| *from == i)
                    .map_or(i, |(_, to)| *to)
            })
            .collect()
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}
