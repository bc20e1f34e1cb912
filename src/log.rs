use serde::{Deserialize, Serialize};

use crate::car::CarSnapshot;

/// One race-log entry, captured at the end of every tick. `player_speed`
/// carries the HUD rounding (one decimal) so a replayed log renders the
/// same status line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    pub tick: u64,
    pub cars: Vec<CarSnapshot>,
    pub player_speed: f64,
    pub alive_opponents: usize,
}
