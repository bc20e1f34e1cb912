//! Track geometry. The road runs horizontally; cars advance along x and
//! hold a transverse lane position y inside the band between `ROAD_TOP`
//! and `ROAD_BOTTOM`.

pub const ROAD_CENTER_Y: f64 = 300.0;
pub const ROAD_HEIGHT: f64 = 360.0;
pub const ROAD_TOP: f64 = ROAD_CENTER_Y - ROAD_HEIGHT / 2.0;
pub const ROAD_BOTTOM: f64 = ROAD_CENTER_Y + ROAD_HEIGHT / 2.0;

pub const CAR_HEIGHT: f64 = 18.0;

// Extra inset for the player clamp so the player cannot drift off-road.
pub const PLAYER_MARGIN: f64 = 8.0;

pub const LANE_COUNT: usize = 6;
pub const LANE_GAP: f64 = ROAD_HEIGHT / (LANE_COUNT as f64 + 1.0);

// Fixed on-screen anchor for the player; the camera offset is derived
// from it every tick.
pub const PLAYER_SCREEN_X: f64 = 200.0;

pub fn lane_y(lane: usize) -> f64 {
    ROAD_TOP + (lane as f64 + 1.0) * LANE_GAP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_sit_inside_the_band() {
        for lane in 0..LANE_COUNT {
            let y = lane_y(lane);
            assert!(y > ROAD_TOP + CAR_HEIGHT / 2.0);
            assert!(y < ROAD_BOTTOM - CAR_HEIGHT / 2.0);
        }
    }
}
