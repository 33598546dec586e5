//! Instrument key ranges and interval-to-key mapping.
//!
//! The engine knows exactly one fact about an instrument: which keys it can
//! play. Everything else (samples, effects, gain) lives with the renderer.

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};
use crate::theory::Interval;

/// Subtracted from every mapped key so a `[0, 12]` interval set straddles
/// the register center instead of sitting above it.
pub const SCALE_OFFSET: i32 = 6;

/// Inclusive range of playable MIDI keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentKeyRange {
    pub lower: i32,
    pub upper: i32,
}

impl InstrumentKeyRange {
    /// A full 88-key piano, A0 to C8.
    pub const PIANO: InstrumentKeyRange = InstrumentKeyRange {
        lower: 21,
        upper: 108,
    };

    pub fn new(lower: i32, upper: i32) -> Result<Self> {
        let range = Self { lower, upper };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lower < 0 || self.upper > 127 || self.lower > self.upper {
            return Err(GenerationError::InvalidKeyRange {
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }

    pub fn contains(&self, key: i32) -> bool {
        (self.lower..=self.upper).contains(&key)
    }

    /// Key halfway between the bounds (rounded down).
    pub fn middle_key(&self) -> i32 {
        (self.lower + self.upper) / 2
    }

    /// Number of semitones between the bounds.
    pub fn span(&self) -> i32 {
        self.upper - self.lower
    }
}

impl Default for InstrumentKeyRange {
    fn default() -> Self {
        Self::PIANO
    }
}

/// Map intervals onto concrete keys around `middle_key`.
///
/// `key = middle_key + starting_key_offset + interval - SCALE_OFFSET`.
/// Keys outside `range` are dropped, not folded back in, so the result may be
/// shorter than `intervals`.
pub fn map_to_keys(
    intervals: &[Interval],
    starting_key_offset: i32,
    middle_key: i32,
    range: &InstrumentKeyRange,
) -> Vec<u8> {
    intervals
        .iter()
        .map(|&interval| middle_key + starting_key_offset + interval - SCALE_OFFSET)
        .filter(|&key| range.contains(key))
        .filter_map(|key| u8::try_from(key).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piano_range() {
        let piano = InstrumentKeyRange::PIANO;
        assert!(piano.validate().is_ok());
        assert_eq!(piano.middle_key(), 64);
        assert_eq!(piano.span(), 87);
    }

    #[test]
    fn rejects_bad_ranges() {
        assert!(InstrumentKeyRange::new(80, 40).is_err());
        assert!(InstrumentKeyRange::new(-1, 40).is_err());
        assert!(InstrumentKeyRange::new(0, 128).is_err());
        assert!(InstrumentKeyRange::new(60, 60).is_ok());
    }

    #[test]
    fn maps_around_center() {
        let range = InstrumentKeyRange::new(53, 84).unwrap();
        let keys = map_to_keys(&[0, 4, 7, 12], 2, range.middle_key(), &range);
        // middle 68, offset 2, scale offset 6 -> base 64
        assert_eq!(keys, vec![64, 68, 71, 76]);
    }

    #[test]
    fn out_of_range_keys_are_dropped() {
        let range = InstrumentKeyRange::new(53, 84).unwrap();
        let keys = map_to_keys(&[-24, 0, 12, 36], 0, range.middle_key(), &range);
        // 38 and 98 fall outside and vanish.
        assert_eq!(keys, vec![62, 74]);
    }

    #[test]
    fn single_root_maps_to_base_key() {
        let range = InstrumentKeyRange::PIANO;
        for offset in -6..6 {
            let keys = map_to_keys(&[0], offset, 64, &range);
            assert_eq!(keys, vec![(64 + offset - SCALE_OFFSET) as u8]);
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = InstrumentKeyRange::new(60, 72).unwrap();
        let keys = map_to_keys(&[0, 12], 0, 66, &range);
        assert_eq!(keys, vec![60, 72]);
    }
}
