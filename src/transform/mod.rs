//! Stochastic operators over interval sequences.
//!
//! Every operator is a variant of the closed [`Transformation`] enum, so the
//! random walk in [`pipeline`] can enumerate them and tests can drive each
//! one directly. Operators never touch global state; all randomness comes
//! from the `rng` argument.

pub mod pipeline;

pub use pipeline::{IntervalPipeline, PipelineRun};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::TransformConfig;
use crate::sampling::gaussian;
use crate::theory::{Interval, Mode};

/// Semitones per octave.
pub const OCTAVE: Interval = 12;

/// One stochastic operator over an interval sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transformation {
    /// Geometric duplication of each interval, then an independent keep/drop.
    DupOrDrop,
    Reverse,
    /// One left-to-right pass of random adjacent swaps.
    Swap,
    /// Random intervals inserted before the sequence and after each element.
    RandomInsert,
    /// Gaussian octave shift per interval. Always applied last.
    Inversion,
    /// Random mode substitution. Scale seeds only.
    ModeScale,
}

impl Transformation {
    /// Operators the pipeline's random walk may choose.
    pub const RANDOM_WALK: [Transformation; 4] = [
        Transformation::DupOrDrop,
        Transformation::Reverse,
        Transformation::Swap,
        Transformation::RandomInsert,
    ];

    pub fn is_random_walk(self) -> bool {
        Self::RANDOM_WALK.contains(&self)
    }

    /// Apply this operator with the probabilities from `params`.
    pub fn apply(
        self,
        intervals: &[Interval],
        params: &TransformConfig,
        rng: &mut impl Rng,
    ) -> Vec<Interval> {
        match self {
            Transformation::DupOrDrop => dup_or_drop(
                intervals,
                params.duplicate_probability,
                params.keep_probability,
                rng,
            ),
            Transformation::Reverse => intervals.iter().rev().copied().collect(),
            Transformation::Swap => swap_adjacent(intervals, params.swap_probability, rng),
            Transformation::RandomInsert => {
                random_insert(intervals, params.insert_probability, rng)
            }
            Transformation::Inversion => invert(intervals, params.inversion_std_dev, rng),
            Transformation::ModeScale => Mode::random(rng).apply(intervals),
        }
    }
}

fn dup_or_drop(
    intervals: &[Interval],
    duplicate: f64,
    keep: f64,
    rng: &mut impl Rng,
) -> Vec<Interval> {
    let mut out = Vec::with_capacity(intervals.len());
    for &interval in intervals {
        while rng.gen_bool(duplicate) {
            out.push(interval);
        }
        if rng.gen_bool(keep) {
            out.push(interval);
        }
    }
    out
}

fn swap_adjacent(intervals: &[Interval], probability: f64, rng: &mut impl Rng) -> Vec<Interval> {
    let mut out = intervals.to_vec();
    for i in 0..out.len().saturating_sub(1) {
        if rng.gen_bool(probability) {
            out.swap(i, i + 1);
        }
    }
    out
}

fn random_insert(intervals: &[Interval], probability: f64, rng: &mut impl Rng) -> Vec<Interval> {
    let mut out = Vec::with_capacity(intervals.len() * 2 + 1);
    if rng.gen_bool(probability) {
        out.push(rng.gen_range(0..=OCTAVE));
    }
    for &interval in intervals {
        out.push(interval);
        if rng.gen_bool(probability) {
            out.push(rng.gen_range(0..=OCTAVE));
        }
    }
    out
}

fn invert(intervals: &[Interval], std_dev: f64, rng: &mut impl Rng) -> Vec<Interval> {
    intervals
        .iter()
        .map(|&interval| {
            let shift = gaussian(0.0, std_dev, rng).round() as Interval;
            interval + OCTAVE * shift
        })
        .collect()
}
