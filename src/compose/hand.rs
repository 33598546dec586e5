//! Per-hand rhythm and polyphony engine.
//!
//! A hand run walks through its key list inside one measure, assigning onsets,
//! durations and velocities while tracking which keys are still sounding. A
//! key that is still held is never retriggered. Harmonic chords strike every
//! accepted key on one onset and stop at the complexity budget; sequential
//! play types only advance time some of the time, which yields runs of quick
//! notes over sustained ones.

use std::collections::BTreeMap;

use rand::Rng;

use super::rhythm::DurationDistribution;
use crate::config::RhythmConfig;
use crate::error::{GenerationError, Result};
use crate::event::{Note, TimeSignature, MAX_VELOCITY, MIN_VELOCITY};
use crate::instrument::InstrumentKeyRange;
use crate::theory::PlayType;

/// Which part of the keyboard a hand run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
    /// A single hand centered on the whole register.
    Solo,
}

impl Hand {
    /// Register center for this hand on `range`.
    pub fn register_center(self, range: &InstrumentKeyRange) -> i32 {
        let quarter = range.span() / 4;
        match self {
            Hand::Left => range.middle_key() - quarter,
            Hand::Right => range.middle_key() + quarter,
            Hand::Solo => range.middle_key(),
        }
    }
}

/// What one hand plays in one measure.
#[derive(Debug, Clone)]
pub struct HandPlan {
    pub play_type: PlayType,
    pub keys: Vec<u8>,
    /// Maximum number of keys held at once.
    pub complexity: usize,
    pub durations: DurationDistribution,
}

/// Time bounds for a hand run, in beats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureWindow {
    pub start: f64,
    /// Start of the next measure.
    pub end: f64,
    /// End of the whole generation budget.
    pub budget_end: f64,
}

impl MeasureWindow {
    /// Whether a note may still start at `time`.
    pub fn is_open(&self, time: f64) -> bool {
        time < self.end && time < self.budget_end
    }
}

/// Summary of a finished hand run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandOutcome {
    /// Where the hand's clock stopped.
    pub end_time: f64,
    pub notes_played: usize,
    /// Largest number of keys held at once during the run.
    pub peak_polyphony: usize,
}

/// Play `plan` inside `window`, appending notes to `notes`.
///
/// `rhythm` is validated on every call, so a hand-built config with an
/// out-of-range probability fails here instead of panicking in the RNG.
pub fn play_hand(
    plan: &HandPlan,
    window: MeasureWindow,
    time_signature: &TimeSignature,
    rhythm: &RhythmConfig,
    rng: &mut impl Rng,
    notes: &mut Vec<Note>,
) -> Result<HandOutcome> {
    if plan.complexity == 0 {
        return Err(GenerationError::invalid("complexity budget must be positive"));
    }
    rhythm.validate()?;

    let simultaneous = plan.play_type.is_simultaneous();
    let mut time = window.start;
    // key -> release time
    let mut held: BTreeMap<u8, f64> = BTreeMap::new();
    let mut outcome = HandOutcome {
        end_time: time,
        notes_played: 0,
        peak_polyphony: 0,
    };

    if rng.gen_bool(rhythm.leading_rest_probability) {
        time += plan.durations.sample_beats(time_signature, rng)?;
    }

    let attempts = plan.keys.len() * rhythm.max_key_cycles;
    for &key in plan.keys.iter().cycle().take(attempts) {
        if !window.is_open(time) {
            break;
        }
        let over_budget = if simultaneous {
            held.len() >= plan.complexity
        } else {
            held.len() > plan.complexity
        };
        if over_budget {
            break;
        }
        if held.contains_key(&key) {
            continue;
        }

        let duration = plan
            .durations
            .sample_beats(time_signature, rng)?
            .max(rhythm.min_duration_beats);
        let velocity = rng.gen_range(MIN_VELOCITY..=MAX_VELOCITY);
        notes.push(Note::new(time, duration, key, velocity));
        held.insert(key, time + duration);
        outcome.notes_played += 1;
        outcome.peak_polyphony = outcome.peak_polyphony.max(held.len());

        if !simultaneous && rng.gen_bool(rhythm.advance_probability) {
            time += plan.durations.sample_beats(time_signature, rng)?;
        }
        held.retain(|_, release| *release > time);
    }

    if simultaneous && outcome.notes_played > 0 {
        time += plan.durations.sample_beats(time_signature, rng)?;
    }
    outcome.end_time = time;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rhythm() -> RhythmConfig {
        RhythmConfig::default()
    }

    fn window() -> MeasureWindow {
        MeasureWindow {
            start: 0.0,
            end: 4.0,
            budget_end: 100.0,
        }
    }

    fn plan(play_type: PlayType, keys: Vec<u8>, complexity: usize) -> HandPlan {
        HandPlan {
            play_type,
            keys,
            complexity,
            durations: DurationDistribution::from_mean(0.25),
        }
    }

    #[test]
    fn register_centers() {
        let piano = InstrumentKeyRange::PIANO;
        assert_eq!(Hand::Solo.register_center(&piano), 64);
        assert_eq!(Hand::Left.register_center(&piano), 64 - 21);
        assert_eq!(Hand::Right.register_center(&piano), 64 + 21);
    }

    #[test]
    fn harmonic_chord_shares_onset_and_respects_budget() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let no_rest = RhythmConfig {
            leading_rest_probability: 0.0,
            ..rhythm()
        };
        for complexity in 1..=6 {
            let mut notes = Vec::new();
            let p = plan(PlayType::HarmonicChord, vec![60, 64, 67, 71, 72, 76, 79], complexity);
            let out =
                play_hand(&p, window(), &TimeSignature::default(), &no_rest, &mut rng, &mut notes)
                    .unwrap();
            assert_eq!(notes.len(), complexity);
            assert!(out.peak_polyphony <= complexity);
            assert!(notes.iter().all(|n| n.time == 0.0));
            assert!(out.end_time > 0.0);
        }
    }

    #[test]
    fn held_keys_are_not_retriggered() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let p = plan(PlayType::HarmonicChord, vec![60, 60, 60], 6);
        let mut notes = Vec::new();
        let no_rest = RhythmConfig {
            leading_rest_probability: 0.0,
            ..rhythm()
        };
        play_hand(&p, window(), &TimeSignature::default(), &no_rest, &mut rng, &mut notes).unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn sequential_notes_stay_inside_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let ts = TimeSignature::default();
        for play_type in [PlayType::ArpeggioChord, PlayType::Scale] {
            for _ in 0..200 {
                let mut notes = Vec::new();
                let p = HandPlan {
                    durations: DurationDistribution::random(&mut rng),
                    ..plan(play_type, vec![60, 62, 64, 65, 67], 3)
                };
                let w = MeasureWindow {
                    start: 8.0,
                    end: 12.0,
                    budget_end: 11.0,
                };
                play_hand(&p, w, &ts, &rhythm(), &mut rng, &mut notes).unwrap();
                for n in &notes {
                    assert!(n.time >= 8.0 && n.time < 11.0, "onset {}", n.time);
                    assert!(n.duration >= 0.1);
                    assert!((MIN_VELOCITY..=MAX_VELOCITY).contains(&n.velocity));
                }
                let mut onsets: Vec<f64> = notes.iter().map(|n| n.time).collect();
                let sorted = onsets.clone();
                onsets.sort_by(f64::total_cmp);
                assert_eq!(onsets, sorted, "a hand's clock never runs backwards");
            }
        }
    }

    #[test]
    fn sequential_polyphony_is_loosely_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for complexity in 1..=6 {
            let mut notes = Vec::new();
            let p = plan(PlayType::ArpeggioChord, (50..70).collect(), complexity);
            let out =
                play_hand(&p, window(), &TimeSignature::default(), &rhythm(), &mut rng, &mut notes)
                    .unwrap();
            assert!(out.peak_polyphony <= complexity + 1);
        }
    }

    #[test]
    fn empty_key_list_plays_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut notes = Vec::new();
        let p = plan(PlayType::Scale, vec![], 3);
        let out =
            play_hand(&p, window(), &TimeSignature::default(), &rhythm(), &mut rng, &mut notes)
                .unwrap();
        assert!(notes.is_empty());
        assert_eq!(out.notes_played, 0);
    }

    #[test]
    fn zero_complexity_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut notes = Vec::new();
        let p = plan(PlayType::Scale, vec![60], 0);
        let err = play_hand(&p, window(), &TimeSignature::default(), &rhythm(), &mut rng, &mut notes)
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidArgument(_)));
    }

    #[test]
    fn bad_rhythm_probability_is_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut notes = Vec::new();
        let p = plan(PlayType::Scale, vec![60, 62], 2);
        for bad in [1.5, -0.1, f64::NAN] {
            let r = RhythmConfig {
                leading_rest_probability: bad,
                ..rhythm()
            };
            assert!(play_hand(&p, window(), &TimeSignature::default(), &r, &mut rng, &mut notes).is_err());
            let r = RhythmConfig {
                advance_probability: bad,
                ..rhythm()
            };
            assert!(play_hand(&p, window(), &TimeSignature::default(), &r, &mut rng, &mut notes).is_err());
        }
        assert!(notes.is_empty());
    }

    #[test]
    fn closed_window_plays_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut notes = Vec::new();
        let p = plan(PlayType::ArpeggioChord, vec![60, 64], 2);
        let w = MeasureWindow {
            start: 4.0,
            end: 8.0,
            budget_end: 4.0,
        };
        play_hand(&p, w, &TimeSignature::default(), &rhythm(), &mut rng, &mut notes).unwrap();
        assert!(notes.is_empty());
    }
}
