//! Generator configuration — every tunable of the engine, loadable from
//! ~/.cadenza/generator.yaml.
//!
//! All sections default field-by-field, so a YAML file only needs to list
//! what it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};
use crate::event::{TimeSignature, MAX_TEMPO_BPM, MIN_TEMPO_BPM};
use crate::theory::{Chord, PlayType, Scale};
use crate::transform::Transformation;

/// Time signature and tempo candidates for requests that don't pin them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    pub time_signatures: Vec<TimeSignature>,
    pub tempo_mean: f64,
    pub tempo_std_dev: f64,
    pub tempo_min: f64,
    pub tempo_max: f64,
    /// Longest performance, in measures, a single generation may produce.
    pub max_measures: usize,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            time_signatures: TimeSignature::COMMON.to_vec(),
            tempo_mean: 100.0,
            tempo_std_dev: 35.0,
            tempo_min: MIN_TEMPO_BPM,
            tempo_max: MAX_TEMPO_BPM,
            max_measures: 10_000,
        }
    }
}

/// Which chords, scales and play types a hand may draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub play_types: Vec<PlayType>,
    pub chords: Vec<Chord>,
    pub scales: Vec<Scale>,
    /// Random 7th extension and suspension on every chord draw.
    pub chord_extensions: bool,
    /// Random mode substitution on every scale draw.
    pub mode_substitution: bool,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            play_types: PlayType::ALL.to_vec(),
            chords: Chord::ALL.to_vec(),
            scales: Scale::ALL.to_vec(),
            chord_extensions: true,
            mode_substitution: true,
        }
    }
}

/// Interval pipeline tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Operators the random walk chooses from.
    pub enabled: Vec<Transformation>,
    pub continuation_min: f64,
    pub continuation_max: f64,
    pub duplicate_probability: f64,
    pub keep_probability: f64,
    pub swap_probability: f64,
    pub insert_probability: f64,
    /// Standard deviation, in octaves, of the final register spread.
    pub inversion_std_dev: f64,
    pub max_intervals: usize,
    pub max_steps: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            enabled: Transformation::RANDOM_WALK.to_vec(),
            continuation_min: 0.8,
            continuation_max: 0.95,
            duplicate_probability: 0.25,
            keep_probability: 0.75,
            swap_probability: 0.3,
            insert_probability: 0.2,
            inversion_std_dev: 2.0,
            max_intervals: 10,
            max_steps: 50,
        }
    }
}

/// Per-hand rhythm and polyphony tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmConfig {
    pub leading_rest_probability: f64,
    /// Chance that a sequential note is followed by a time advance.
    pub advance_probability: f64,
    /// How many times a hand may cycle through its key list per measure.
    pub max_key_cycles: usize,
    pub complexity_min: usize,
    pub complexity_max: usize,
    pub min_duration_beats: f64,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            leading_rest_probability: 0.15,
            advance_probability: 0.3,
            max_key_cycles: 10,
            complexity_min: 1,
            complexity_max: 6,
            min_duration_beats: 0.1,
        }
    }
}

impl RhythmConfig {
    pub fn validate(&self) -> Result<()> {
        check_probability("rhythm.leading_rest_probability", self.leading_rest_probability)?;
        check_probability("rhythm.advance_probability", self.advance_probability)?;
        if self.complexity_min == 0 {
            return Err(GenerationError::invalid("rhythm.complexity_min must be positive"));
        }
        if self.complexity_min > self.complexity_max {
            return Err(GenerationError::invalid(
                "rhythm.complexity_min exceeds rhythm.complexity_max",
            ));
        }
        if self.max_key_cycles == 0 {
            return Err(GenerationError::invalid("rhythm.max_key_cycles must be positive"));
        }
        check_positive("rhythm.min_duration_beats", self.min_duration_beats)
    }
}

/// Two-hand split tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandsConfig {
    pub two_hand_probability: f64,
    pub starting_offset_min: i32,
    /// Exclusive upper bound.
    pub starting_offset_max: i32,
    /// Hand runs per hand per measure before the hand gives up on the bar.
    pub max_runs_per_measure: usize,
}

impl Default for HandsConfig {
    fn default() -> Self {
        Self {
            two_hand_probability: 0.95,
            starting_offset_min: -6,
            starting_offset_max: 6,
            max_runs_per_measure: 64,
        }
    }
}

/// Timing jitter applied to the finished note list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizeConfig {
    pub enabled: bool,
    /// Upper bound of the uniform draw whose square root gives the jitter in seconds.
    pub max_variance: f64,
    pub min_duration_beats: f64,
}

impl Default for HumanizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_variance: 0.3,
            min_duration_beats: 0.1,
        }
    }
}

/// Complete generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub meter: MeterConfig,
    pub vocabulary: VocabularyConfig,
    pub transform: TransformConfig,
    pub rhythm: RhythmConfig,
    pub hands: HandsConfig,
    pub humanize: HumanizeConfig,
    /// Total generation attempts when a run comes back empty.
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            meter: MeterConfig::default(),
            vocabulary: VocabularyConfig::default(),
            transform: TransformConfig::default(),
            rhythm: RhythmConfig::default(),
            hands: HandsConfig::default(),
            humanize: HumanizeConfig::default(),
            max_attempts: 2,
        }
    }
}

impl GeneratorConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| GenerationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| GenerationError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&content)
    }

    /// Load from the standard path (~/.cadenza/generator.yaml).
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path())
    }

    /// Write as YAML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |e: std::io::Error| GenerationError::Config(format!("{}: {e}", path.display()));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| GenerationError::Config(e.to_string()))?;
        std::fs::write(path, yaml).map_err(io_err)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        let m = &self.meter;
        if m.time_signatures.is_empty() {
            return Err(GenerationError::invalid("meter.time_signatures is empty"));
        }
        for ts in &m.time_signatures {
            ts.validate()?;
        }
        check_finite("meter.tempo_mean", m.tempo_mean)?;
        check_non_negative("meter.tempo_std_dev", m.tempo_std_dev)?;
        check_ordered("meter.tempo", m.tempo_min, m.tempo_max)?;
        if m.tempo_min <= 0.0 {
            return Err(GenerationError::invalid("meter.tempo_min must be positive"));
        }

        let v = &self.vocabulary;
        if v.play_types.is_empty() || v.chords.is_empty() || v.scales.is_empty() {
            return Err(GenerationError::invalid(
                "vocabulary play_types, chords and scales must be non-empty",
            ));
        }

        let t = &self.transform;
        if let Some(op) = t.enabled.iter().find(|op| !op.is_random_walk()) {
            return Err(GenerationError::invalid(format!(
                "{op:?} cannot be part of the random walk"
            )));
        }
        check_probability("transform.continuation_min", t.continuation_min)?;
        check_probability("transform.continuation_max", t.continuation_max)?;
        check_ordered("transform.continuation", t.continuation_min, t.continuation_max)?;
        check_probability("transform.duplicate_probability", t.duplicate_probability)?;
        check_probability("transform.keep_probability", t.keep_probability)?;
        check_probability("transform.swap_probability", t.swap_probability)?;
        check_probability("transform.insert_probability", t.insert_probability)?;
        check_non_negative("transform.inversion_std_dev", t.inversion_std_dev)?;
        if t.duplicate_probability >= 1.0 {
            return Err(GenerationError::invalid(
                "transform.duplicate_probability must be below 1",
            ));
        }
        if t.max_intervals == 0 || t.max_steps == 0 {
            return Err(GenerationError::invalid(
                "transform.max_intervals and transform.max_steps must be positive",
            ));
        }

        if m.max_measures == 0 {
            return Err(GenerationError::invalid("meter.max_measures must be positive"));
        }

        self.rhythm.validate()?;

        let h = &self.hands;
        check_probability("hands.two_hand_probability", h.two_hand_probability)?;
        if h.starting_offset_min >= h.starting_offset_max {
            return Err(GenerationError::invalid(
                "hands.starting_offset_min must be below hands.starting_offset_max",
            ));
        }
        if h.max_runs_per_measure == 0 {
            return Err(GenerationError::invalid("hands.max_runs_per_measure must be positive"));
        }

        let hu = &self.humanize;
        check_non_negative("humanize.max_variance", hu.max_variance)?;
        check_positive("humanize.min_duration_beats", hu.min_duration_beats)?;

        if self.max_attempts == 0 {
            return Err(GenerationError::invalid("max_attempts must be positive"));
        }
        Ok(())
    }
}

/// Default config path: ~/.cadenza/generator.yaml.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".cadenza");
    path.push("generator.yaml");
    path
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(GenerationError::invalid(format!("{name} is not finite")));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    check_finite(name, value)?;
    if value < 0.0 {
        return Err(GenerationError::invalid(format!("{name} must not be negative")));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    check_finite(name, value)?;
    if value <= 0.0 {
        return Err(GenerationError::invalid(format!("{name} must be positive")));
    }
    Ok(())
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GenerationError::invalid(format!(
            "{name} = {value} is not a probability"
        )));
    }
    Ok(())
}

fn check_ordered(name: &str, min: f64, max: f64) -> Result<()> {
    if min > max {
        return Err(GenerationError::invalid(format!("{name} range is inverted")));
    }
    Ok(())
}
