//! Interval vocabulary — chords, scales, and modes as semitone offsets.
//!
//! Intervals are relative to an implicit reference register, never absolute
//! pitches; [`instrument::map_to_keys`](crate::instrument::map_to_keys)
//! turns them into keys.

pub mod chord;
pub mod mode;
pub mod scale;

pub use chord::{Chord, SeventhExtension, Suspension};
pub use mode::Mode;
pub use scale::Scale;

use serde::{Deserialize, Serialize};

/// Signed semitone offset from the reference register.
pub type Interval = i32;

/// How one hand plays its interval set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    /// Chord tones played one after another.
    ArpeggioChord,
    /// Chord tones struck together.
    HarmonicChord,
    /// Scale tones played one after another.
    Scale,
}

impl PlayType {
    pub const ALL: [PlayType; 3] = [
        PlayType::ArpeggioChord,
        PlayType::HarmonicChord,
        PlayType::Scale,
    ];

    /// Whether all notes share one onset.
    pub fn is_simultaneous(self) -> bool {
        self == PlayType::HarmonicChord
    }

    pub fn uses_scale(self) -> bool {
        self == PlayType::Scale
    }
}
