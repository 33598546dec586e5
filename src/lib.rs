//! Cadenza — procedural symbolic piano performances for audio/MIDI training data.
//!
//! Given an instrument key range and a target duration, the [`Composer`]
//! produces a list of timed notes built from chords, scales and modes,
//! mutated by a bounded random walk and played by two independent hands.

pub mod compose;
pub mod config;
pub mod error;
pub mod event;
pub mod instrument;
pub mod sampling;
pub mod theory;
pub mod transform;

pub use compose::{Composer, GenerationRequest};
pub use config::GeneratorConfig;
pub use error::{GenerationError, Result};
pub use event::{Note, Performance, Tempo, TimeSignature};
pub use instrument::InstrumentKeyRange;
