//! Chord vocabulary and the chord-colouring operators (7ths, suspensions).

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Interval;

/// A chord shape, as semitone offsets from its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chord {
    Major,
    Minor,
    Diminished,
    Augmented,
    Single,
    /// Four uniform draws in `[0, 12]`.
    Random,
}

impl Chord {
    pub const ALL: [Chord; 6] = [
        Chord::Major,
        Chord::Minor,
        Chord::Diminished,
        Chord::Augmented,
        Chord::Single,
        Chord::Random,
    ];

    /// The uncoloured chord tones. Only `Random` consumes randomness.
    pub fn base_intervals(self, rng: &mut impl Rng) -> Vec<Interval> {
        match self {
            Chord::Major => vec![0, 4, 7, 12],
            Chord::Minor => vec![0, 3, 7, 12],
            Chord::Diminished => vec![0, 3, 6, 12],
            Chord::Augmented => vec![0, 4, 8, 12],
            Chord::Single => vec![0],
            Chord::Random => (0..4).map(|_| rng.gen_range(0..=12)).collect(),
        }
    }

    /// Chord tones with a random 7th extension and suspension applied.
    ///
    /// With `colour` off the base intervals are returned untouched.
    pub fn intervals(self, colour: bool, rng: &mut impl Rng) -> Vec<Interval> {
        let base = self.base_intervals(rng);
        if !colour {
            return base;
        }
        let seventh = SeventhExtension::ALL[rng.gen_range(0..SeventhExtension::ALL.len())];
        let suspension = Suspension::ALL[rng.gen_range(0..Suspension::ALL.len())];
        suspension.apply(&seventh.apply(&base))
    }
}

/// Optionally stacks a 7th on top of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeventhExtension {
    None,
    Major7,
    Minor7,
}

impl SeventhExtension {
    pub const ALL: [SeventhExtension; 3] = [
        SeventhExtension::None,
        SeventhExtension::Major7,
        SeventhExtension::Minor7,
    ];

    /// Append the 7th (if any) and re-sort.
    pub fn apply(self, intervals: &[Interval]) -> Vec<Interval> {
        let extra = match self {
            SeventhExtension::None => return intervals.to_vec(),
            SeventhExtension::Major7 => 11,
            SeventhExtension::Minor7 => 10,
        };
        let mut out = intervals.to_vec();
        out.push(extra);
        out.sort_unstable();
        out
    }
}

/// Optionally replaces the major third with a 2nd or a 4th.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suspension {
    None,
    Sus2,
    Sus4,
}

impl Suspension {
    pub const ALL: [Suspension; 3] = [Suspension::None, Suspension::Sus2, Suspension::Sus4];

    pub fn apply(self, intervals: &[Interval]) -> Vec<Interval> {
        let replacement = match self {
            Suspension::None => return intervals.to_vec(),
            Suspension::Sus2 => 2,
            Suspension::Sus4 => 5,
        };
        intervals
            .iter()
            .map(|&i| if i == 4 { replacement } else { i })
            .collect()
    }
}
