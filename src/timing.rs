use rand::Rng;

/// Hardware/UI responsiveness floor. No keystroke interval ever goes below this.
pub const MIN_INTERVAL_SECS: f64 = 0.005;

/// Base seconds per keystroke for a target typing speed.
///
/// One word is counted as six keystrokes (five characters plus a separator).
pub fn base_interval_secs(wpm: u32) -> f64 {
    let keystrokes_per_second = wpm as f64 * 6.0 / 60.0;
    let interval = if keystrokes_per_second > 0.0 {
        1.0 / keystrokes_per_second
    } else {
        0.01
    };
    interval.max(MIN_INTERVAL_SECS)
}

/// Per-word speed multiplier. Longer words are typed with more fluency.
pub fn word_speed_factor(word: &str) -> f64 {
    match word.chars().count() {
        0..=3 => 1.1,
        4..=5 => 1.0,
        6..=8 => 0.9,
        _ => 0.8,
    }
}

/// Apply uniform speed variation to a keystroke interval.
///
/// Intervals at or below 10ms are left unvaried; below 20ms the variation is
/// halved so high-speed runs do not stutter. The result is floored again at
/// [`MIN_INTERVAL_SECS`].
pub fn jittered_interval_secs(
    interval: f64,
    variation_pct: u32,
    enabled: bool,
    rng: &mut impl Rng,
) -> f64 {
    let out = if enabled && interval > 0.01 {
        let mut variation = variation_pct as f64 / 100.0;
        if interval < 0.02 {
            variation *= 0.5;
        }
        interval * rng.gen_range(1.0 - variation..=1.0 + variation)
    } else {
        interval
    };
    out.max(MIN_INTERVAL_SECS)
}
