use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::control::ControlInput;
use crate::track::{CAR_HEIGHT, PLAYER_MARGIN, ROAD_BOTTOM, ROAD_CENTER_Y, ROAD_TOP};

pub const PLAYER_MAX_SPEED: f64 = 8.0;

const ACCEL_STEP: f64 = 0.28;
const DRAG_STEP: f64 = 0.12;
const BRAKE_STEP: f64 = 0.5;
const LANE_STEP: f64 = 4.0;

const SPEED_RELAX: f64 = 0.01;
const RECENTER_PULL: f64 = 0.01;
const WAVE_FREQUENCY: f64 = 0.02;
const WAVE_SCALE: f64 = 0.06;
const JITTER_SCALE: f64 = 0.6;
const CRASH_BASE_PROB: f64 = 0.000_12;
const CRASH_IMPULSE: f64 = 100.0;

/// One vehicle, player or autonomous. `x` is the forward distance along
/// the track, `y` the lane offset inside the band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub max_speed: f64,
    /// Stability factor in [0, 1]; 1.0 is a perfect driver. Damps both the
    /// drift oscillation and the crash probability.
    pub control: f64,
    /// Lateral oscillation amplitude; 0 for the player.
    pub drift: f64,
    /// Per-vehicle phase seed so fleets do not oscillate in lockstep.
    pub phase: f64,
    pub alive: bool,
    pub color: String,
    pub is_player: bool,
}

impl Car {
    pub fn player(y: f64) -> Self {
        Self {
            x: 0.0,
            y,
            speed: 0.0,
            max_speed: PLAYER_MAX_SPEED,
            control: 1.0,
            drift: 0.0,
            phase: 0.0,
            alive: true,
            color: "crimson".to_string(),
            is_player: true,
        }
    }

    pub fn autonomous<R: Rng>(x: f64, y: f64, color: String, rng: &mut R) -> Self {
        Self {
            x,
            y,
            speed: PLAYER_MAX_SPEED * rng.gen_range(0.6..1.0),
            max_speed: PLAYER_MAX_SPEED * rng.gen_range(0.95..1.01),
            control: rng.gen_range(0.7..1.0),
            drift: rng.gen_range(4.0..12.0),
            phase: rng.gen_range(0.0..1000.0),
            alive: true,
            color,
            is_player: false,
        }
    }

    /// Advances this car by one tick. Eliminated cars are frozen: the call
    /// is a no-op once `alive` is false.
    ///
    /// The player branch reads the control signals and draws no randomness;
    /// the autonomous branch draws exactly three uniforms per tick
    /// (recenter jitter, lateral jitter, crash roll) plus a fourth only
    /// when the crash fires. The draw order is fixed so seeded runs replay
    /// bit-exact.
    pub fn update<R: Rng>(&mut self, input: Option<&ControlInput>, rng: &mut R) {
        if !self.alive {
            return;
        }

        if self.is_player {
            let input = input.copied().unwrap_or_default();

            if input.accelerate {
                self.speed = (self.speed + ACCEL_STEP).min(self.max_speed);
            } else {
                // Engine drag when the throttle is released.
                self.speed = (self.speed - DRAG_STEP).max(0.0);
            }
            if input.brake {
                self.speed = (self.speed - BRAKE_STEP).max(0.0);
            }

            if input.lane_up {
                self.y -= LANE_STEP;
            }
            if input.lane_down {
                self.y += LANE_STEP;
            }

            // The player is boxed inside the band; only autonomous cars
            // can leave the road.
            let top = ROAD_TOP + PLAYER_MARGIN + CAR_HEIGHT / 2.0;
            let bottom = ROAD_BOTTOM - PLAYER_MARGIN - CAR_HEIGHT / 2.0;
            self.y = self.y.clamp(top, bottom);

            self.x += self.speed;
        } else {
            // Relax toward the target speed; approaches from below, so no
            // clamp is needed.
            self.speed += (self.max_speed - self.speed) * SPEED_RELAX;

            // Waveform is sampled at the pre-advance position.
            let wave =
                ((self.x + self.phase) * WAVE_FREQUENCY).sin() * self.drift * (1.0 - self.control);
            self.y += ((ROAD_CENTER_Y + rng.gen_range(-4.0..4.0)) - self.y) * RECENTER_PULL;
            self.y += wave * WAVE_SCALE + rng.gen_range(-0.5..0.5) * JITTER_SCALE;

            self.x += self.speed;

            // Loss-of-control roll: one Bernoulli trial per tick, scaled by
            // recklessness and how close the car runs to its top speed.
            let crash_prob =
                CRASH_BASE_PROB * (1.0 - self.control) * (self.speed / self.max_speed + 0.2);
            if rng.gen::<f64>() < crash_prob {
                self.y += rng.gen_range(-CRASH_IMPULSE..CRASH_IMPULSE);
            }
        }

        let top_limit = ROAD_TOP + CAR_HEIGHT / 2.0;
        let bottom_limit = ROAD_BOTTOM - CAR_HEIGHT / 2.0;
        if self.y < top_limit || self.y > bottom_limit {
            self.alive = false;
        }
    }

    pub fn snapshot(&self) -> CarSnapshot {
        CarSnapshot {
            x: self.x,
            y: self.y,
            alive: self.alive,
            color: self.color.clone(),
            is_player: self.is_player,
        }
    }
}

/// Read-only view of one car, handed to the render/HUD collaborators and
/// recorded in the race log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarSnapshot {
    pub x: f64,
    pub y: f64,
    pub alive: bool,
    pub color: String,
    pub is_player: bool,
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn steady_ai() -> Car {
        Car {
            x: 0.0,
            y: ROAD_CENTER_Y,
            speed: 2.0,
            max_speed: PLAYER_MAX_SPEED,
            control: 1.0,
            drift: 0.0,
            phase: 0.0,
            alive: true,
            color: "gold".to_string(),
            is_player: false,
        }
    }

    #[test]
    fn player_speed_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut car = Car::player(ROAD_CENTER_Y);

        let throttle = ControlInput {
            accelerate: true,
            ..ControlInput::default()
        };
        for _ in 0..100 {
            car.update(Some(&throttle), &mut rng);
            assert!(car.speed >= 0.0 && car.speed <= car.max_speed);
        }
        assert!((car.speed - PLAYER_MAX_SPEED).abs() < f64::EPSILON);

        let brake = ControlInput {
            brake: true,
            ..ControlInput::default()
        };
        for _ in 0..100 {
            car.update(Some(&brake), &mut rng);
            assert!(car.speed >= 0.0);
        }
        assert!(car.speed.abs() < f64::EPSILON);
    }

    #[test]
    fn missing_input_decays_like_neutral() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut with_none = Car::player(ROAD_CENTER_Y);
        with_none.speed = 5.0;
        let mut with_neutral = with_none.clone();

        with_none.update(None, &mut rng);
        with_neutral.update(Some(&ControlInput::default()), &mut rng);

        assert!((with_none.speed - with_neutral.speed).abs() < f64::EPSILON);
        assert!((with_none.x - with_neutral.x).abs() < f64::EPSILON);
    }

    #[test]
    fn player_is_clamped_at_the_band_edges() {
        let mut rng = StdRng::seed_from_u64(1);
        let top = ROAD_TOP + PLAYER_MARGIN + CAR_HEIGHT / 2.0;
        let bottom = ROAD_BOTTOM - PLAYER_MARGIN - CAR_HEIGHT / 2.0;

        let mut car = Car::player(top);
        let up = ControlInput {
            lane_up: true,
            ..ControlInput::default()
        };
        car.update(Some(&up), &mut rng);
        assert!((car.y - top).abs() < f64::EPSILON);
        assert!(car.alive);

        car.y = bottom;
        let down = ControlInput {
            lane_down: true,
            ..ControlInput::default()
        };
        car.update(Some(&down), &mut rng);
        assert!((car.y - bottom).abs() < f64::EPSILON);
        assert!(car.alive);
    }

    #[test]
    fn off_band_car_is_eliminated_and_frozen() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut car = steady_ai();
        car.y = ROAD_TOP; // above the top limit once the half-height counts

        car.update(None, &mut rng);
        assert!(!car.alive);

        let frozen = car.clone();
        for _ in 0..10 {
            car.update(None, &mut rng);
        }
        assert!(!car.alive);
        assert!((car.x - frozen.x).abs() < f64::EPSILON);
        assert!((car.y - frozen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn perfect_driver_converges_without_crashing() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut car = steady_ai();

        let mut previous = car.speed;
        for _ in 0..600 {
            car.update(None, &mut rng);
            assert!(car.alive);
            assert!(car.speed >= previous);
            assert!(car.speed >= 0.0 && car.speed <= car.max_speed + 1e-9);
            assert!(car.y > ROAD_TOP + CAR_HEIGHT / 2.0);
            assert!(car.y < ROAD_BOTTOM - CAR_HEIGHT / 2.0);
            previous = car.speed;
        }
        assert!(car.max_speed - car.speed < 0.05);
    }
}
