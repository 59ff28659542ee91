use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use retype::control::ReplayControls;
use retype::engine::{replay, ReplayConfig, RunOutcome};
use retype::model::EventLog;
use retype::sim;
use retype::sink::{ConsoleSink, Recorder};
use retype::status::{Severity, StatusUpdate};

#[derive(Debug, Parser)]
#[command(name = "retype")]
#[command(about = "Replay text as human-like keystrokes", long_about = None)]
struct Cli {
    /// Input text file, or '-' for stdin
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Target typing speed in words per minute
    #[arg(long, default_value_t = 60)]
    wpm: u32,

    /// Countdown before the first keystroke, in seconds
    #[arg(long, default_value_t = 3)]
    start_delay: u64,

    /// Inject random typos with backspace corrections
    #[arg(long)]
    typos: bool,

    /// Per-word typo probability, in percent
    #[arg(long, default_value_t = 5)]
    typo_chance: u32,

    /// Disable random thinking pauses between words
    #[arg(long)]
    no_pauses: bool,

    /// Per-gap pause probability, in percent
    #[arg(long, default_value_t = 15)]
    pause_chance: u32,

    /// Longest random inter-word pause, in seconds
    #[arg(long, default_value_t = 2.0)]
    max_pause: f64,

    /// Disable per-keystroke speed variation
    #[arg(long)]
    no_variation: bool,

    /// Speed variation amount, in +/- percent
    #[arg(long, default_value_t = 30)]
    variation: u32,

    /// Occasionally type a near-miss word, delete it, and retype it
    #[arg(long)]
    rewrite: bool,

    /// Per-word rewrite probability, in percent
    #[arg(long, default_value_t = 8)]
    rewrite_chance: u32,

    /// Optional RNG seed (for debugging)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the emitted event log as JSON
    #[arg(long, value_name = "PATH")]
    record: Option<PathBuf>,
}

impl Cli {
    fn to_config(&self) -> ReplayConfig {
        ReplayConfig {
            base_speed_wpm: self.wpm,
            use_typos: self.typos,
            typo_chance_pct: self.typo_chance,
            use_pauses: !self.no_pauses,
            pause_chance_pct: self.pause_chance,
            max_pause_seconds: self.max_pause,
            use_variation: !self.no_variation,
            variation_pct: self.variation,
            use_rewrite: self.rewrite,
            rewrite_chance_pct: self.rewrite_chance,
            start_delay_seconds: self.start_delay,
        }
    }
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == std::ffi::OsStr::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn print_status(update: &StatusUpdate) {
    const RESET: &str = "\x1b[0m";

    let color = match update.severity {
        Severity::Info => "\x1b[34m",
        Severity::Success => "\x1b[32m",
        Severity::Warning => "\x1b[33m",
        Severity::Error => "\x1b[31m",
    };

    eprintln!("{color}{} {}{RESET}", update.icon, update.message);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let text = read_input(&cli.input)?;
    let cfg = cli.to_config();

    let controls = ReplayControls::new();
    {
        let controls = controls.clone();
        ctrlc::set_handler(move || controls.request_stop())
            .context("failed to install Ctrl+C handler")?;
    }

    let mut rng = rng_from_seed(cli.seed);
    let mut sink = Recorder::new(ConsoleSink::new());
    let mut status = |update: StatusUpdate| print_status(&update);

    let outcome = replay(&text, &cfg, &mut sink, &controls, &mut status, &mut rng);
    println!();

    let events = sink.into_events();
    let stats = sim::stats(&events);
    eprintln!(
        "Replayed: {} characters, {} backspaces, ~{:.1}s of delay",
        stats.chars,
        stats.backspaces,
        stats.total_sleep_ms as f64 / 1000.0
    );

    if let Some(path) = cli.record {
        let log = EventLog {
            version: 1,
            config: cfg,
            events,
        };
        let json = serde_json::to_string_pretty(&log).context("failed to serialize event log")?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }

    match outcome {
        RunOutcome::Completed | RunOutcome::Stopped => Ok(()),
        RunOutcome::Failed(detail) => Err(anyhow!("replay failed: {detail}")),
    }
}
