//! Event data model — notes, musical time, and finished performances.
//!
//! Everything here is a plain value type. The [`compose`](crate::compose)
//! module produces them; renderers and serializers outside this crate
//! consume them.

pub mod beat;
pub mod performance;
pub mod types;

pub use beat::{Tempo, TimeSignature, MAX_TEMPO_BPM, MIN_TEMPO_BPM};
pub use performance::Performance;
pub use types::{Note, MAX_VELOCITY, MIN_VELOCITY};
