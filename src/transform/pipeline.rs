//! The interval pipeline: vocabulary seed, bounded random walk, register spread.

use rand::Rng;

use super::Transformation;
use crate::config::{TransformConfig, VocabularyConfig};
use crate::error::{GenerationError, Result};
use crate::sampling::pick;
use crate::theory::{Interval, PlayType};

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    /// Intervals drawn from the vocabulary, before any transformation.
    pub seed: Vec<Interval>,
    /// Random-walk operators in the order they were applied.
    pub steps: Vec<Transformation>,
    /// Final intervals, after the inversion spread.
    pub intervals: Vec<Interval>,
}

/// Produces the interval set for one hand run.
///
/// The walk keeps applying a uniformly chosen operator while the sequence is
/// shorter than `max_intervals` and a coin with probability `continuation`
/// comes up heads. `max_steps` caps the walk even when the coin never fails
/// and the operators never grow the sequence.
#[derive(Debug, Clone)]
pub struct IntervalPipeline<'a> {
    transform: &'a TransformConfig,
    vocabulary: &'a VocabularyConfig,
    continuation: f64,
}

impl<'a> IntervalPipeline<'a> {
    pub fn new(
        transform: &'a TransformConfig,
        vocabulary: &'a VocabularyConfig,
        continuation: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&continuation) {
            return Err(GenerationError::invalid(format!(
                "continuation probability {continuation} is not a probability"
            )));
        }
        Ok(Self {
            transform,
            vocabulary,
            continuation,
        })
    }

    /// Build a pipeline whose continuation probability is drawn uniformly
    /// from the configured range.
    pub fn with_random_continuation(
        transform: &'a TransformConfig,
        vocabulary: &'a VocabularyConfig,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        let (lo, hi) = (transform.continuation_min, transform.continuation_max);
        if lo > hi {
            return Err(GenerationError::invalid("continuation range is inverted"));
        }
        Self::new(transform, vocabulary, rng.gen_range(lo..=hi))
    }

    pub fn continuation(&self) -> f64 {
        self.continuation
    }

    /// Draw the starting intervals for `play_type` from the vocabulary.
    pub fn seed(&self, play_type: PlayType, rng: &mut impl Rng) -> Result<Vec<Interval>> {
        let vocab = self.vocabulary;
        if play_type.uses_scale() {
            let scale = pick(&vocab.scales, "scales", rng)?;
            let intervals = scale.intervals(rng);
            if vocab.mode_substitution {
                return Ok(Transformation::ModeScale.apply(&intervals, self.transform, rng));
            }
            return Ok(intervals);
        }
        let chord = pick(&vocab.chords, "chords", rng)?;
        Ok(chord.intervals(vocab.chord_extensions, rng))
    }

    /// Run the bounded random walk over `intervals`.
    pub fn walk(
        &self,
        mut intervals: Vec<Interval>,
        rng: &mut impl Rng,
    ) -> (Vec<Interval>, Vec<Transformation>) {
        let t = self.transform;
        let mut steps = Vec::new();
        while intervals.len() < t.max_intervals
            && steps.len() < t.max_steps
            && !t.enabled.is_empty()
            && rng.gen_bool(self.continuation)
        {
            let op = t.enabled[rng.gen_range(0..t.enabled.len())];
            intervals = op.apply(&intervals, t, rng);
            intervals.truncate(t.max_intervals);
            steps.push(op);
        }
        (intervals, steps)
    }

    /// Seed, walk, then spread across octaves.
    pub fn run(&self, play_type: PlayType, rng: &mut impl Rng) -> Result<PipelineRun> {
        let seed = self.seed(play_type, rng)?;
        let (walked, steps) = self.walk(seed.clone(), rng);
        let intervals = Transformation::Inversion.apply(&walked, self.transform, rng);
        Ok(PipelineRun {
            seed,
            steps,
            intervals,
        })
    }
}
