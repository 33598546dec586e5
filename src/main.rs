//! Cadenza — print one generated performance.
//!
//! Reads ~/.cadenza/generator.yaml (or `--config`) and writes one line per
//! note (or a YAML document with `--yaml`) to stdout. The same seed always
//! prints the same performance.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cadenza::config::default_config_path;
use cadenza::{Composer, GenerationError, GenerationRequest, GeneratorConfig, InstrumentKeyRange};

#[derive(Parser, Debug)]
#[command(name = "cadenza", version, about = "Generate a random piano performance")]
struct Cli {
    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Target duration in seconds
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Lowest playable MIDI key
    #[arg(long, default_value_t = InstrumentKeyRange::PIANO.lower)]
    low: i32,

    /// Highest playable MIDI key
    #[arg(long, default_value_t = InstrumentKeyRange::PIANO.upper)]
    high: i32,

    /// Fixed tempo in BPM (drawn at random if omitted)
    #[arg(short, long)]
    tempo: Option<f64>,

    /// Generator config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the whole performance as YAML instead of one line per note
    #[arg(long)]
    yaml: bool,
}

fn run(cli: &Cli) -> cadenza::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = GeneratorConfig::load_from(&config_path)?;
    info!("config: {}", config_path.display());

    let composer = Composer::new(config)?;
    let instrument = InstrumentKeyRange::new(cli.low, cli.high)?;
    let mut request = GenerationRequest::new(cli.seconds);
    if let Some(bpm) = cli.tempo {
        request = request.with_tempo(bpm);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let performance = composer.generate(&instrument, &request, &mut rng)?;

    if cli.yaml {
        let yaml = serde_yaml::to_string(&performance)
            .map_err(|e| GenerationError::Config(e.to_string()))?;
        print!("{yaml}");
        return Ok(());
    }

    println!(
        "# {}/{} at {:.1} bpm, {} notes, {:.2}s",
        performance.time_signature.notes_per_bar,
        performance.time_signature.note_value,
        performance.tempo.bpm(),
        performance.len(),
        performance.duration_seconds()
    );
    for note in &performance.notes {
        println!(
            "{:>9.4} {:>8.4} {:>3} {:>3}",
            note.time, note.duration, note.key, note.velocity
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
