use std::thread;
use std::time::Duration;

use anyhow::{ensure, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::control::{Interrupted, ReplayControls};
use crate::sink::{InputSink, SinkError};
use crate::status::StatusUpdate;
use crate::timing::{
    base_interval_secs, jittered_interval_secs, word_speed_factor, MIN_INTERVAL_SECS,
};
use crate::typos::{make_wrong_word, plan_typo};

// Below this per-keystroke interval (with variation off) a word is emitted as
// one unit with a single aggregate sleep.
const FAST_WORD_SECS: f64 = 0.01;

/// Timing and realism parameters for one replay. Read-only once a run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub base_speed_wpm: u32,
    pub use_typos: bool,
    pub typo_chance_pct: u32,
    pub use_pauses: bool,
    pub pause_chance_pct: u32,
    pub max_pause_seconds: f64,
    pub use_variation: bool,
    pub variation_pct: u32,
    pub use_rewrite: bool,
    pub rewrite_chance_pct: u32,
    pub start_delay_seconds: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            base_speed_wpm: 60,
            use_typos: false,
            typo_chance_pct: 5,
            use_pauses: true,
            pause_chance_pct: 15,
            max_pause_seconds: 2.0,
            use_variation: true,
            variation_pct: 30,
            use_rewrite: false,
            rewrite_chance_pct: 8,
            start_delay_seconds: 3,
        }
    }
}

pub fn validate_config(cfg: &ReplayConfig) -> Result<()> {
    ensure!(cfg.base_speed_wpm > 0, "base_speed_wpm must be > 0");
    ensure!(
        (1..=100).contains(&cfg.typo_chance_pct),
        "typo_chance_pct must be between 1 and 100"
    );
    ensure!(
        (1..=100).contains(&cfg.pause_chance_pct),
        "pause_chance_pct must be between 1 and 100"
    );
    ensure!(
        (1..=100).contains(&cfg.rewrite_chance_pct),
        "rewrite_chance_pct must be between 1 and 100"
    );
    ensure!(
        cfg.variation_pct <= 100,
        "variation_pct must be between 0 and 100"
    );
    ensure!(
        cfg.max_pause_seconds.is_finite() && cfg.max_pause_seconds > 0.0,
        "max_pause_seconds must be > 0"
    );
    Ok(())
}

/// How a run ended. Every started run terminates in exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Stopped,
    Failed(String),
}

enum ReplayError {
    Stopped,
    Sink(String),
}

impl From<Interrupted> for ReplayError {
    fn from(_: Interrupted) -> Self {
        ReplayError::Stopped
    }
}

impl From<SinkError> for ReplayError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::Failsafe => ReplayError::Stopped,
            SinkError::Other(detail) => ReplayError::Sink(detail),
        }
    }
}

/// Replay `text` into `sink` as human-like keystrokes.
///
/// Runs to completion on the calling thread; the caller is expected to drive
/// it from a background thread and toggle `controls` from elsewhere. At most
/// one run per controls handle should be active at a time. Every failure is
/// converted into a terminal status report; nothing panics or propagates.
pub fn replay(
    text: &str,
    cfg: &ReplayConfig,
    sink: &mut impl InputSink,
    controls: &ReplayControls,
    status: &mut impl FnMut(StatusUpdate),
    rng: &mut impl Rng,
) -> RunOutcome {
    if let Err(err) = validate_config(cfg) {
        status(StatusUpdate::error(
            format!("Invalid replay settings: {err:#}"),
            '⚠',
        ));
        return RunOutcome::Failed(err.to_string());
    }

    match replay_inner(text, cfg, sink, controls, status, rng) {
        Ok(()) => {
            status(StatusUpdate::success("Replay completed successfully!", '✓'));
            RunOutcome::Completed
        }
        Err(ReplayError::Stopped) => {
            status(StatusUpdate::warning("Replay stopped by user", '⏹'));
            RunOutcome::Stopped
        }
        Err(ReplayError::Sink(detail)) => {
            status(StatusUpdate::error(
                format!("Error during replay: {detail}"),
                '⚠',
            ));
            RunOutcome::Failed(detail)
        }
    }
}

fn replay_inner(
    text: &str,
    cfg: &ReplayConfig,
    sink: &mut impl InputSink,
    controls: &ReplayControls,
    status: &mut impl FnMut(StatusUpdate),
    rng: &mut impl Rng,
) -> Result<(), ReplayError> {
    for remaining in (1..=cfg.start_delay_seconds).rev() {
        status(StatusUpdate::warning(
            format!("Starting replay in {remaining} seconds..."),
            '⏱',
        ));
        pausable_sleep(sink, controls, 1.0)?;
    }

    status(StatusUpdate::info("Replaying keystrokes...", '▶'));

    let base_interval = base_interval_secs(cfg.base_speed_wpm);
    let words: Vec<&str> = text.split_whitespace().collect();

    for (index, word) in words.iter().enumerate() {
        controls.checkpoint()?;

        if index > 0 {
            if cfg.use_pauses && chance(cfg.pause_chance_pct, rng) {
                let upper = cfg.max_pause_seconds.max(0.1);
                pausable_sleep(sink, controls, rng.gen_range(0.1..=upper))?;
            }

            // Separators are never speed-varied.
            emit_char(sink, controls, ' ')?;
            sleep_for(sink, base_interval);
        }

        let word_interval = base_interval * word_speed_factor(word);
        let eligible = word.chars().count() > 2;

        if cfg.use_rewrite && eligible && chance(cfg.rewrite_chance_pct, rng) {
            rewrite_word(word, word_interval, cfg, sink, controls, rng)?;
        } else if cfg.use_typos && eligible && chance(cfg.typo_chance_pct, rng) {
            type_word_with_typo(word, word_interval, cfg, sink, controls, rng)?;
        } else {
            type_word_plain(word, word_interval, cfg, sink, controls, rng)?;
        }
    }

    Ok(())
}

fn chance(pct: u32, rng: &mut impl Rng) -> bool {
    rng.gen_range(1..=100) <= pct
}

fn emit_char(
    sink: &mut impl InputSink,
    controls: &ReplayControls,
    c: char,
) -> Result<(), ReplayError> {
    controls.checkpoint()?;
    sink.emit_char(c)?;
    Ok(())
}

fn emit_backspace(
    sink: &mut impl InputSink,
    controls: &ReplayControls,
) -> Result<(), ReplayError> {
    controls.checkpoint()?;
    sink.emit_backspace()?;
    Ok(())
}

fn sleep_for(sink: &mut impl InputSink, secs: f64) {
    let duration = Duration::from_secs_f64(secs);
    sink.note_sleep(duration);
    thread::sleep(duration);
}

fn pausable_sleep(
    sink: &mut impl InputSink,
    controls: &ReplayControls,
    secs: f64,
) -> Result<(), ReplayError> {
    let duration = Duration::from_secs_f64(secs);
    sink.note_sleep(duration);
    controls.pausable_sleep(duration)?;
    Ok(())
}

fn char_delay(
    sink: &mut impl InputSink,
    word_interval: f64,
    cfg: &ReplayConfig,
    rng: &mut impl Rng,
) {
    let secs = jittered_interval_secs(word_interval, cfg.variation_pct, cfg.use_variation, rng);
    sleep_for(sink, secs);
}

fn type_word_plain(
    word: &str,
    word_interval: f64,
    cfg: &ReplayConfig,
    sink: &mut impl InputSink,
    controls: &ReplayControls,
    rng: &mut impl Rng,
) -> Result<(), ReplayError> {
    // At very high speeds the whole word goes out as one unit. The emitted
    // characters are identical; only the granularity changes.
    if word_interval < FAST_WORD_SECS && !cfg.use_variation {
        controls.checkpoint()?;
        sink.emit_str(word)?;
        sleep_for(sink, word_interval * word.chars().count() as f64);
        return Ok(());
    }

    for c in word.chars() {
        emit_char(sink, controls, c)?;
        char_delay(sink, word_interval, cfg, rng);
    }
    Ok(())
}

fn type_word_with_typo(
    word: &str,
    word_interval: f64,
    cfg: &ReplayConfig,
    sink: &mut impl InputSink,
    controls: &ReplayControls,
    rng: &mut impl Rng,
) -> Result<(), ReplayError> {
    let Some(typo) = plan_typo(word, rng) else {
        return type_word_plain(word, word_interval, cfg, sink, controls, rng);
    };

    let chars: Vec<char> = word.chars().collect();

    for &c in &chars[..typo.position] {
        emit_char(sink, controls, c)?;
        char_delay(sink, word_interval, cfg, rng);
    }

    emit_char(sink, controls, typo.wrong_char)?;
    char_delay(sink, word_interval, cfg, rng);

    // Keep typing a little before noticing the mistake.
    let after = (chars.len() - typo.position - 1).min(2);
    for &c in &chars[typo.position + 1..typo.position + 1 + after] {
        emit_char(sink, controls, c)?;
        char_delay(sink, word_interval, cfg, rng);
    }

    pausable_sleep(sink, controls, rng.gen_range(0.3..=0.8))?;

    for _ in 0..after + 1 {
        emit_backspace(sink, controls)?;
        let secs =
            jittered_interval_secs(word_interval * 0.7, cfg.variation_pct, cfg.use_variation, rng);
        sleep_for(sink, secs);
    }

    for &c in &chars[typo.position..] {
        emit_char(sink, controls, c)?;
        char_delay(sink, word_interval, cfg, rng);
    }

    Ok(())
}

fn rewrite_word(
    word: &str,
    word_interval: f64,
    cfg: &ReplayConfig,
    sink: &mut impl InputSink,
    controls: &ReplayControls,
    rng: &mut impl Rng,
) -> Result<(), ReplayError> {
    let wrong = make_wrong_word(word, rng);

    for c in wrong.chars() {
        emit_char(sink, controls, c)?;
        char_delay(sink, word_interval, cfg, rng);
    }

    // Think about it; at high speeds the hesitation shrinks to a beat.
    let think = if word_interval < 0.02 {
        0.3
    } else {
        rng.gen_range(0.5..=1.0)
    };
    pausable_sleep(sink, controls, think)?;

    for _ in 0..wrong.chars().count() {
        emit_backspace(sink, controls)?;
        sleep_for(sink, (word_interval * 0.3).max(MIN_INTERVAL_SECS));
    }

    for c in word.chars() {
        emit_char(sink, controls, c)?;
        char_delay(sink, word_interval, cfg, rng);
    }

    Ok(())
}
