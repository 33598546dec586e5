//! Note data model — the only thing a generation call hands back to renderers.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Lowest velocity the generator emits. Velocity 0 means note-off in MIDI.
pub const MIN_VELOCITY: u8 = 10;
/// Highest MIDI velocity.
pub const MAX_VELOCITY: u8 = 127;

/// A single sounding note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Onset, in beats from the start of the performance.
    pub time: f64,
    /// Length, in beats.
    pub duration: f64,
    /// MIDI key number (0–127).
    pub key: u8,
    /// MIDI velocity (1–127).
    pub velocity: u8,
}

impl Note {
    pub fn new(time: f64, duration: f64, key: u8, velocity: u8) -> Self {
        Self {
            time,
            duration,
            key,
            velocity,
        }
    }

    /// Time at which the note stops sounding.
    pub fn end(&self) -> f64 {
        self.time + self.duration
    }

    /// Velocity normalized into `[0, 1]`.
    pub fn velocity_fraction(&self) -> f64 {
        self.velocity as f64 / MAX_VELOCITY as f64
    }

    /// Total order on notes: by onset, then by key.
    pub fn onset_order(a: &Note, b: &Note) -> Ordering {
        a.time.total_cmp(&b.time).then(a.key.cmp(&b.key))
    }
}
