use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use retype::control::ReplayControls;
use retype::engine::{replay, ReplayConfig, RunOutcome};
use retype::model::Event;
use retype::sim;
use retype::sink::{InputSink, NullSink, Recorder, SinkError};
use retype::status::{Severity, StatusUpdate};
use retype::timing::base_interval_secs;

fn plain_cfg(wpm: u32) -> ReplayConfig {
    ReplayConfig {
        base_speed_wpm: wpm,
        use_typos: false,
        use_pauses: false,
        use_variation: false,
        use_rewrite: false,
        start_delay_seconds: 0,
        ..Default::default()
    }
}

fn run(text: &str, cfg: &ReplayConfig, seed: u64) -> (Vec<Event>, RunOutcome, Vec<StatusUpdate>) {
    let controls = ReplayControls::new();
    let mut sink = Recorder::new(NullSink);
    let mut statuses = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    let outcome = replay(
        text,
        cfg,
        &mut sink,
        &controls,
        &mut |update| statuses.push(update),
        &mut rng,
    );

    (sink.into_events(), outcome, statuses)
}

fn emitted_chars(events: &[Event]) -> Vec<char> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Char { c } => Some(*c),
            _ => None,
        })
        .collect()
}

#[test]
fn short_word_types_plainly_with_slowdown() {
    let (events, outcome, _) = run("cat", &plain_cfg(60), 1);

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(emitted_chars(&events), vec!['c', 'a', 't']);

    let stats = sim::stats(&events);
    assert_eq!(stats.backspaces, 0);

    // Three keystrokes at the 3-letter-word factor of 1.1.
    let expected_ms = 3.0 * base_interval_secs(60) * 1.1 * 1000.0;
    assert!(
        (stats.total_sleep_ms as f64 - expected_ms).abs() < 15.0,
        "expected ~{expected_ms}ms of delay, got {}ms",
        stats.total_sleep_ms
    );
}

#[test]
fn words_are_joined_by_single_separators() {
    let (events, outcome, _) = run("hello   world", &plain_cfg(300), 2);

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(emitted_chars(&events).iter().collect::<String>(), "hello world");
    assert_eq!(sim::stats(&events).backspaces, 0);
    assert_eq!(sim::final_text(&events), "hello world");
}

#[test]
fn forced_typo_round_trips_to_the_original_word() {
    let mut cfg = plain_cfg(300);
    cfg.use_typos = true;
    cfg.typo_chance_pct = 100;

    let target: Vec<char> = "testing".chars().collect();
    let mut divergences = 0;

    for seed in 0..6 {
        let (events, outcome, _) = run("testing", &cfg, seed);
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(sim::final_text(&events), "testing");

        let stats = sim::stats(&events);
        assert!(
            (1..=3).contains(&stats.backspaces),
            "expected 1-3 backspaces, got {}",
            stats.backspaces
        );
        assert_eq!(stats.chars, target.len() + stats.backspaces);

        // The wrong keystroke lands strictly inside the word.
        let before_correction: Vec<char> = events
            .iter()
            .take_while(|e| !matches!(e, Event::Backspace))
            .filter_map(|e| match e {
                Event::Char { c } => Some(*c),
                _ => None,
            })
            .collect();

        if let Some(position) = before_correction
            .iter()
            .zip(target.iter())
            .position(|(got, want)| got != want)
        {
            assert!(
                (1..=5).contains(&position),
                "wrong character at position {position}"
            );
            divergences += 1;
        }
    }

    // The 30% random-letter branch can collide with the correct key, but not
    // on every seed.
    assert!(divergences >= 1, "no visible typo across any seed");
}

#[test]
fn forced_rewrite_round_trips_to_the_original_word() {
    let mut cfg = plain_cfg(1_000);
    cfg.use_rewrite = true;
    cfg.rewrite_chance_pct = 100;

    for seed in 0..3 {
        let (events, outcome, _) = run("because", &cfg, seed);
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(sim::final_text(&events), "because");
        assert!(sim::stats(&events).backspaces >= 1);
    }
}

#[test]
fn rewrite_wins_over_typo_when_both_fire() {
    let mut cfg = plain_cfg(1_000);
    cfg.use_rewrite = true;
    cfg.rewrite_chance_pct = 100;
    cfg.use_typos = true;
    cfg.typo_chance_pct = 100;

    let (events, outcome, _) = run("because", &cfg, 5);
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(sim::final_text(&events), "because");

    // A rewrite deletes the whole wrong variant; a typo never deletes more
    // than three characters.
    assert!(sim::stats(&events).backspaces >= 4);
}

#[test]
fn very_fast_words_emit_as_one_unit() {
    let (events, outcome, _) = run("fast", &plain_cfg(100_000), 3);

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(emitted_chars(&events), vec!['f', 'a', 's', 't']);

    let stats = sim::stats(&events);
    assert_eq!(stats.sleeps, 1, "fast path should sleep once per word");
    assert_eq!(stats.total_sleep_ms, 20);
}

#[test]
fn empty_text_completes_immediately() {
    let (events, outcome, statuses) = run("", &plain_cfg(300), 4);

    assert_eq!(outcome, RunOutcome::Completed);
    assert!(events.is_empty());
    assert!(statuses
        .iter()
        .any(|s| s.severity == Severity::Success));
}

#[test]
fn countdown_is_reported_once_per_second() {
    let mut cfg = plain_cfg(100_000);
    cfg.start_delay_seconds = 1;

    let (_, outcome, statuses) = run("hi", &cfg, 6);

    assert_eq!(outcome, RunOutcome::Completed);
    let countdown: Vec<_> = statuses
        .iter()
        .filter(|s| s.message.starts_with("Starting replay in"))
        .collect();
    assert_eq!(countdown.len(), 1);
    assert_eq!(countdown[0].severity, Severity::Warning);
}

#[test]
fn invalid_config_fails_fast_without_emitting() {
    let cfg = ReplayConfig {
        base_speed_wpm: 0,
        ..plain_cfg(60)
    };

    let (events, outcome, statuses) = run("hello", &cfg, 7);

    assert!(matches!(outcome, RunOutcome::Failed(_)));
    assert!(events.is_empty());
    assert_eq!(statuses.last().unwrap().severity, Severity::Error);
}

struct FailsafeAfter {
    limit: usize,
    emitted: usize,
}

impl InputSink for FailsafeAfter {
    fn emit_char(&mut self, _c: char) -> Result<(), SinkError> {
        if self.emitted == self.limit {
            return Err(SinkError::Failsafe);
        }
        self.emitted += 1;
        Ok(())
    }

    fn emit_backspace(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[test]
fn failsafe_mid_word_stops_the_run() {
    let controls = ReplayControls::new();
    let mut sink = FailsafeAfter {
        limit: 3,
        emitted: 0,
    };
    let mut statuses = Vec::new();
    let mut rng = StdRng::seed_from_u64(8);

    let outcome = replay(
        "hello world",
        &plain_cfg(300),
        &mut sink,
        &controls,
        &mut |update| statuses.push(update),
        &mut rng,
    );

    assert_eq!(outcome, RunOutcome::Stopped);
    assert_eq!(sink.emitted, 3, "no characters after the fail-safe");
    assert!(statuses
        .iter()
        .any(|s| s.severity == Severity::Warning && s.message.contains("stopped")));
}

struct BrokenSink;

impl InputSink for BrokenSink {
    fn emit_char(&mut self, _c: char) -> Result<(), SinkError> {
        Err(SinkError::Other("synthetic focus loss".to_string()))
    }

    fn emit_backspace(&mut self) -> Result<(), SinkError> {
        Err(SinkError::Other("synthetic focus loss".to_string()))
    }
}

#[test]
fn sink_failure_is_reported_with_detail() {
    let controls = ReplayControls::new();
    let mut sink = BrokenSink;
    let mut statuses = Vec::new();
    let mut rng = StdRng::seed_from_u64(9);

    let outcome = replay(
        "hello",
        &plain_cfg(300),
        &mut sink,
        &controls,
        &mut |update| statuses.push(update),
        &mut rng,
    );

    match outcome {
        RunOutcome::Failed(detail) => assert!(detail.contains("synthetic focus loss")),
        other => panic!("expected a failed outcome, got {other:?}"),
    }
    assert!(statuses
        .iter()
        .any(|s| s.severity == Severity::Error && s.message.contains("synthetic focus loss")));
}
