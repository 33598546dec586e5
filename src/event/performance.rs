//! A finished performance: notes plus the tempo and meter they were written in.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::beat::{Tempo, TimeSignature};
use super::types::Note;
use crate::error::{GenerationError, Result};
use crate::instrument::InstrumentKeyRange;

/// The result of one generation call.
///
/// Notes come out sorted by [`Note::onset_order`] unless humanization
/// nudged neighbouring onsets past each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub notes: Vec<Note>,
    pub tempo: Tempo,
    pub time_signature: TimeSignature,
}

impl Performance {
    pub fn new(notes: Vec<Note>, tempo: Tempo, time_signature: TimeSignature) -> Self {
        Self {
            notes,
            tempo,
            time_signature,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether the notes are non-decreasing under [`Note::onset_order`].
    pub fn is_sorted(&self) -> bool {
        self.notes
            .windows(2)
            .all(|w| Note::onset_order(&w[0], &w[1]).is_le())
    }

    /// Beat at which the last note stops sounding (0 for an empty performance).
    pub fn end_beats(&self) -> f64 {
        self.notes.iter().map(Note::end).fold(0.0, f64::max)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.tempo.beats_to_seconds(self.end_beats())
    }

    /// Inclusive range of semitone shifts that keep every note inside `range`.
    ///
    /// Returns `None` for an empty performance or when the notes span more
    /// keys than the instrument has.
    pub fn transposition_range(&self, range: &InstrumentKeyRange) -> Option<RangeInclusive<i32>> {
        let min_key = self.notes.iter().map(|n| n.key as i32).min()?;
        let max_key = self.notes.iter().map(|n| n.key as i32).max()?;
        let down = range.lower - min_key;
        let up = range.upper - max_key;
        (down <= up).then_some(down..=up)
    }

    /// Copy of this performance with every key shifted by `semitones`.
    pub fn transposed(&self, semitones: i32) -> Result<Self> {
        let notes = self
            .notes
            .iter()
            .map(|n| {
                let key = n.key as i32 + semitones;
                u8::try_from(key)
                    .ok()
                    .filter(|k| *k <= 127)
                    .map(|key| Note { key, ..*n })
                    .ok_or_else(|| {
                        GenerationError::invalid(format!(
                            "transposing key {} by {semitones} leaves the MIDI range",
                            n.key
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { notes, ..*self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn perf(keys: &[u8]) -> Performance {
        let notes = keys
            .iter()
            .enumerate()
            .map(|(i, &k)| Note::new(i as f64, 1.0, k, 90))
            .collect();
        Performance::new(notes, Tempo::new(120.0).unwrap(), TimeSignature::default())
    }

    #[test]
    fn end_and_duration() {
        let p = perf(&[60, 62, 64]);
        assert_approx_eq!(p.end_beats(), 3.0);
        assert_approx_eq!(p.duration_seconds(), 1.5);
        assert!(p.is_sorted());
    }

    #[test]
    fn empty_performance() {
        let p = perf(&[]);
        assert!(p.is_empty());
        assert_approx_eq!(p.end_beats(), 0.0);
        assert!(p.transposition_range(&InstrumentKeyRange::PIANO).is_none());
    }

    #[test]
    fn transposition_range_fits_instrument() {
        let p = perf(&[60, 72]);
        let range = InstrumentKeyRange::new(53, 84).unwrap();
        assert_eq!(p.transposition_range(&range), Some(-7..=12));
    }

    #[test]
    fn transposition_range_too_wide() {
        let p = perf(&[21, 108]);
        let range = InstrumentKeyRange::new(53, 84).unwrap();
        assert!(p.transposition_range(&range).is_none());
    }

    #[test]
    fn transposed_shifts_keys() {
        let p = perf(&[60, 64]).transposed(-12).unwrap();
        assert_eq!(p.notes[0].key, 48);
        assert_eq!(p.notes[1].key, 52);
        assert!(perf(&[120]).transposed(10).is_err());
        assert!(perf(&[3]).transposed(-4).is_err());
    }

    #[test]
    fn detects_unsorted() {
        let mut p = perf(&[60, 62]);
        p.notes.swap(0, 1);
        assert!(!p.is_sorted());
    }
}
