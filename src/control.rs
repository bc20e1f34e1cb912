use serde::{Deserialize, Serialize};

/// Directional signals held during one tick, recomputed by the host from
/// its key state every frame. The default value is all-neutral, which is
/// also what a missing input means.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInput {
    pub accelerate: bool,
    pub brake: bool,
    pub lane_up: bool,
    pub lane_down: bool,
}
