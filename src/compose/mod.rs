//! Composition engine — turns a seeded RNG into a finished performance.
//!
//! The [`Composer`] resolves tempo and meter, then walks measure by measure.
//! Each measure splits into a left and right hand (or, rarely, one centered
//! hand); each hand draws intervals from the [`IntervalPipeline`], maps them
//! onto the instrument, and plays them through the [`hand`] engine. The
//! sorted note list is finally passed through the [`humanize`] jitter.
//!
//! The composer never owns a generator. Pass a seeded `ChaCha8Rng` to get
//! bit-identical output for identical inputs.

pub mod hand;
pub mod humanize;
pub mod rhythm;

pub use hand::{play_hand, Hand, HandOutcome, HandPlan, MeasureWindow};
pub use humanize::humanize;
pub use rhythm::{DurationDistribution, DURATION_VALUES};

use log::{debug, trace, warn};
use rand::Rng;

use crate::config::GeneratorConfig;
use crate::error::{GenerationError, Result};
use crate::event::{Note, Performance, Tempo, TimeSignature};
use crate::instrument::{map_to_keys, InstrumentKeyRange};
use crate::sampling::{gaussian, pick};
use crate::transform::IntervalPipeline;

/// What the caller wants generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRequest {
    /// Target length in seconds; converted to beats with the resolved tempo.
    pub target_seconds: f64,
    /// Fixed tempo in BPM. Drawn from the configured distribution if `None`.
    pub tempo: Option<f64>,
    /// Fixed time signature. Drawn from the configured table if `None`.
    pub time_signature: Option<TimeSignature>,
}

impl GenerationRequest {
    pub fn new(target_seconds: f64) -> Self {
        Self {
            target_seconds,
            tempo: None,
            time_signature: None,
        }
    }

    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.tempo = Some(bpm);
        self
    }

    pub fn with_time_signature(mut self, time_signature: TimeSignature) -> Self {
        self.time_signature = Some(time_signature);
        self
    }
}

/// The generative composition engine.
#[derive(Debug, Clone)]
pub struct Composer {
    config: GeneratorConfig,
}

impl Composer {
    /// Create a composer, rejecting invalid configuration up front.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one performance for `instrument`.
    ///
    /// An empty result is retried with the same tempo, meter and instrument
    /// until `max_attempts` is used up; a final empty result is returned as
    /// is.
    pub fn generate(
        &self,
        instrument: &InstrumentKeyRange,
        request: &GenerationRequest,
        rng: &mut impl Rng,
    ) -> Result<Performance> {
        instrument.validate()?;
        if !request.target_seconds.is_finite() || request.target_seconds < 0.0 {
            return Err(GenerationError::invalid(format!(
                "target duration {}s is not a non-negative number",
                request.target_seconds
            )));
        }

        let time_signature = self.resolve_time_signature(request, rng)?;
        let tempo = self.resolve_tempo(request, rng)?;
        let budget_beats = tempo.seconds_to_beats(request.target_seconds);
        debug!(
            "generating {:.2} beats at {:.1} bpm in {}/{} for keys {}..={}",
            budget_beats,
            tempo.bpm(),
            time_signature.notes_per_bar,
            time_signature.note_value,
            instrument.lower,
            instrument.upper
        );

        let mut notes = retry_until_non_empty(self.config.max_attempts, || {
            self.compose_notes(instrument, &time_signature, budget_beats, rng)
        })?;

        if self.config.humanize.enabled {
            let sigma = humanize(&mut notes, tempo, &self.config.humanize, rng);
            trace!("humanized {} notes with sigma {sigma:.4} beats", notes.len());
        }
        debug!("generated {} notes", notes.len());
        Ok(Performance::new(notes, tempo, time_signature))
    }

    /// Run the measure loop once and return the notes sorted by onset then key.
    ///
    /// No humanization and no retry. Each hand keeps replaying fresh runs
    /// until its clock crosses the bar (or the budget), so the next measure
    /// only starts once both hands have filled this one.
    pub fn compose_notes(
        &self,
        instrument: &InstrumentKeyRange,
        time_signature: &TimeSignature,
        budget_beats: f64,
        rng: &mut impl Rng,
    ) -> Result<Vec<Note>> {
        time_signature.validate()?;
        let cfg = &self.config;
        let bar = time_signature.bar_length_beats();
        if !budget_beats.is_finite() || budget_beats < 0.0 {
            return Err(GenerationError::invalid(format!(
                "beat budget {budget_beats} is not a non-negative number"
            )));
        }
        let measures = (budget_beats / bar).ceil();
        if measures > cfg.meter.max_measures as f64 {
            return Err(GenerationError::invalid(format!(
                "{budget_beats} beats needs {measures} measures, limit is {}",
                cfg.meter.max_measures
            )));
        }

        let pipeline =
            IntervalPipeline::with_random_continuation(&cfg.transform, &cfg.vocabulary, rng)?;

        let mut notes = Vec::new();
        let mut measure_start = 0.0;
        let mut measure = 0usize;
        while measure_start < budget_beats {
            let window = MeasureWindow {
                start: measure_start,
                end: measure_start + bar,
                budget_end: budget_beats,
            };
            let offset =
                rng.gen_range(cfg.hands.starting_offset_min..cfg.hands.starting_offset_max);
            let hands: &[Hand] = if rng.gen_bool(cfg.hands.two_hand_probability) {
                &[Hand::Left, Hand::Right]
            } else {
                &[Hand::Solo]
            };

            for &hand in hands {
                let fill = self.fill_hand(
                    &pipeline,
                    hand,
                    offset,
                    window,
                    time_signature,
                    instrument,
                    rng,
                    &mut notes,
                )?;
                trace!(
                    "measure {measure} {hand:?}: {} runs, {} notes, clock at {:.3}",
                    fill.runs,
                    fill.notes_played,
                    fill.end_time
                );
                if window.is_open(fill.end_time) {
                    debug!("measure {measure} {hand:?}: stopped after {} runs", fill.runs);
                }
            }

            measure_start += bar;
            measure += 1;
        }

        notes.sort_by(Note::onset_order);
        Ok(notes)
    }

    /// Replay fresh hand runs from where the previous one stopped until the
    /// hand's clock leaves `window` or `max_runs_per_measure` is reached.
    #[allow(clippy::too_many_arguments)]
    fn fill_hand(
        &self,
        pipeline: &IntervalPipeline<'_>,
        hand: Hand,
        starting_key_offset: i32,
        window: MeasureWindow,
        time_signature: &TimeSignature,
        instrument: &InstrumentKeyRange,
        rng: &mut impl Rng,
        notes: &mut Vec<Note>,
    ) -> Result<HandFill> {
        let mut fill = HandFill {
            end_time: window.start,
            runs: 0,
            notes_played: 0,
        };
        while window.is_open(fill.end_time) && fill.runs < self.config.hands.max_runs_per_measure {
            let plan = self.plan_hand(pipeline, hand, starting_key_offset, instrument, rng)?;
            let run_window = MeasureWindow {
                start: fill.end_time,
                ..window
            };
            let outcome = play_hand(
                &plan,
                run_window,
                time_signature,
                &self.config.rhythm,
                rng,
                notes,
            )?;
            trace!(
                "{hand:?} run {}: {:?} with {} keys, budget {}, {} notes, ends at {:.3}",
                fill.runs,
                plan.play_type,
                plan.keys.len(),
                plan.complexity,
                outcome.notes_played,
                outcome.end_time
            );
            fill.end_time = outcome.end_time;
            fill.notes_played += outcome.notes_played;
            fill.runs += 1;
        }
        Ok(fill)
    }

    /// Draw everything one hand run needs.
    fn plan_hand(
        &self,
        pipeline: &IntervalPipeline<'_>,
        hand: Hand,
        starting_key_offset: i32,
        instrument: &InstrumentKeyRange,
        rng: &mut impl Rng,
    ) -> Result<HandPlan> {
        let cfg = &self.config;
        let play_type = pick(&cfg.vocabulary.play_types, "play types", rng)?;
        let run = pipeline.run(play_type, rng)?;
        let keys = map_to_keys(
            &run.intervals,
            starting_key_offset,
            hand.register_center(instrument),
            instrument,
        );
        let complexity = rng.gen_range(cfg.rhythm.complexity_min..=cfg.rhythm.complexity_max);
        Ok(HandPlan {
            play_type,
            keys,
            complexity,
            durations: DurationDistribution::random(rng),
        })
    }

    fn resolve_time_signature(
        &self,
        request: &GenerationRequest,
        rng: &mut impl Rng,
    ) -> Result<TimeSignature> {
        let ts = match request.time_signature {
            Some(ts) => ts,
            None => pick(&self.config.meter.time_signatures, "time signatures", rng)?,
        };
        ts.validate()?;
        Ok(ts)
    }

    fn resolve_tempo(&self, request: &GenerationRequest, rng: &mut impl Rng) -> Result<Tempo> {
        let meter = &self.config.meter;
        let bpm = match request.tempo {
            Some(bpm) => bpm,
            None => gaussian(meter.tempo_mean, meter.tempo_std_dev, rng)
                .clamp(meter.tempo_min, meter.tempo_max),
        };
        Tempo::new(bpm)
    }
}

/// Where one hand's clock ended after filling a measure.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HandFill {
    end_time: f64,
    runs: usize,
    notes_played: usize,
}

/// Call `attempt` until it returns notes or `max_attempts` calls are used.
fn retry_until_non_empty(
    max_attempts: u32,
    mut attempt: impl FnMut() -> Result<Vec<Note>>,
) -> Result<Vec<Note>> {
    let mut notes = Vec::new();
    for n in 1..=max_attempts {
        notes = attempt()?;
        if !notes.is_empty() {
            break;
        }
        if n < max_attempts {
            warn!("attempt {n} produced no notes, retrying");
        } else {
            warn!("giving up after {n} empty attempts");
        }
    }
    Ok(notes)
}
