use crate::model::Event;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayStats {
    pub events: usize,
    pub chars: usize,
    pub backspaces: usize,
    pub sleeps: usize,
    pub total_sleep_ms: u64,
}

pub fn stats(events: &[Event]) -> ReplayStats {
    let mut out = ReplayStats {
        events: events.len(),
        ..Default::default()
    };

    for event in events {
        match event {
            Event::Char { .. } => out.chars += 1,
            Event::Backspace => out.backspaces += 1,
            Event::Sleep { ms } => {
                out.sleeps += 1;
                out.total_sleep_ms = out.total_sleep_ms.saturating_add(*ms);
            }
        }
    }

    out
}

/// Net visible text after applying every emitted character and backspace.
///
/// This is intended for tests/debugging: it models the focused application as
/// a plain append-at-end text buffer.
pub fn final_text(events: &[Event]) -> String {
    let mut buf: Vec<char> = Vec::new();
    for event in events {
        match event {
            Event::Char { c } => buf.push(*c),
            Event::Backspace => {
                buf.pop();
            }
            Event::Sleep { .. } => {}
        }
    }
    buf.into_iter().collect()
}
