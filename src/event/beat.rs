//! Musical time: time signatures, tempo, and beat/second conversion.
//!
//! All generation happens in beats. Seconds only appear at the edges, when a
//! caller asks for a target duration or wants to know how long a result lasts.

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// Slowest tempo the engine will produce.
pub const MIN_TEMPO_BPM: f64 = 40.0;
/// Fastest tempo the engine will produce.
pub const MAX_TEMPO_BPM: f64 = 200.0;

/// A time signature such as 4/4 or 6/8.
///
/// Only scales durations and marks measure boundaries; beat arithmetic is
/// independent of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    pub notes_per_bar: u32,
    pub note_value: u32,
}

impl TimeSignature {
    /// The candidate table used when a request does not pin a time signature.
    pub const COMMON: [TimeSignature; 10] = [
        TimeSignature::of(4, 4),
        TimeSignature::of(3, 4),
        TimeSignature::of(2, 4),
        TimeSignature::of(2, 2),
        TimeSignature::of(3, 8),
        TimeSignature::of(6, 8),
        TimeSignature::of(9, 8),
        TimeSignature::of(12, 8),
        TimeSignature::of(5, 4),
        TimeSignature::of(6, 4),
    ];

    const fn of(notes_per_bar: u32, note_value: u32) -> Self {
        Self {
            notes_per_bar,
            note_value,
        }
    }

    /// Create a validated time signature. `note_value` must be 2, 4 or 8.
    pub fn new(notes_per_bar: u32, note_value: u32) -> Result<Self> {
        let ts = Self::of(notes_per_bar, note_value);
        ts.validate()?;
        Ok(ts)
    }

    /// Check the invariants of a (possibly deserialized) time signature.
    pub fn validate(&self) -> Result<()> {
        if self.notes_per_bar == 0 || !matches!(self.note_value, 2 | 4 | 8) {
            return Err(GenerationError::InvalidTimeSignature {
                notes_per_bar: self.notes_per_bar,
                note_value: self.note_value,
            });
        }
        Ok(())
    }

    /// Length of one measure in beats.
    pub fn bar_length_beats(&self) -> f64 {
        self.notes_per_bar as f64
    }

    /// Convert a note value (1.0 = whole note, 0.25 = quarter) into beats.
    pub fn note_value_to_beats(&self, value: f64) -> f64 {
        value * self.note_value as f64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::of(4, 4)
    }
}

/// Tempo in beats per minute, always inside `[MIN_TEMPO_BPM, MAX_TEMPO_BPM]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Tempo(f64);

impl Tempo {
    /// Create a tempo, clamping into the supported range.
    ///
    /// Non-finite input is rejected rather than clamped.
    pub fn new(bpm: f64) -> Result<Self> {
        if !bpm.is_finite() {
            return Err(GenerationError::invalid(format!("tempo {bpm} is not finite")));
        }
        Ok(Self(bpm.clamp(MIN_TEMPO_BPM, MAX_TEMPO_BPM)))
    }

    pub fn bpm(self) -> f64 {
        self.0
    }

    pub fn beats_per_second(self) -> f64 {
        self.0 / 60.0
    }

    pub fn seconds_to_beats(self, seconds: f64) -> f64 {
        seconds * self.beats_per_second()
    }

    pub fn beats_to_seconds(self, beats: f64) -> f64 {
        beats / self.beats_per_second()
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self(120.0)
    }
}
