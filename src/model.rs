use serde::{Deserialize, Serialize};

use crate::engine::ReplayConfig;

/// A recorded replay: the configuration it ran under plus every emitted event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    pub version: u32,
    pub config: ReplayConfig,
    pub events: Vec<Event>,
}

/// One unit of simulated typing work, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Char { c: char },
    Backspace,
    Sleep { ms: u64 },
}
