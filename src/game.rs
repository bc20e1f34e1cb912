use std::fs::File;
use std::io::Write;

use color_eyre::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::car::{Car, CarSnapshot};
use crate::control::ControlInput;
use crate::log::Log;
use crate::track::{lane_y, LANE_COUNT, PLAYER_SCREEN_X, ROAD_CENTER_Y};

pub const DEFAULT_AI_COUNT: usize = 19;

// Start-grid spacing for cars stacked behind the start line.
const ROW_GAP: f64 = 60.0;
const FIRST_ROW_OFFSET: f64 = 80.0;

const PALETTE: [&str; 10] = [
    "dodgerblue",
    "gold",
    "fuchsia",
    "limegreen",
    "darkorange",
    "cyan",
    "magenta",
    "peru",
    "hotpink",
    "turquoise",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ongoing,
    PlayerEliminated,
    AllOpponentsEliminated,
}

/// The whole simulation: the car fleet, the camera, the tick counter and
/// the random stream feeding the autonomous drivers. Exclusively owns and
/// mutates the cars; collaborators only see snapshots.
#[derive(Debug, Clone)]
pub struct Game {
    cars: Vec<Car>,
    camera_x: f64,
    ticks: u64,
    status: Status,
    logs: Vec<Log>,
    rng: StdRng,
}

impl Game {
    /// Builds the starting grid: player on the start line at track center,
    /// `ai_count` opponents round-robined over the lanes. Overflow cars
    /// are pushed behind the start line row by row so nobody shares a
    /// start position or begins outside the band.
    ///
    /// Pass a seed for a deterministic run; `None` seeds from entropy.
    pub fn new(ai_count: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut cars = Vec::with_capacity(1 + ai_count);
        cars.push(Car::player(ROAD_CENTER_Y));

        for i in 0..ai_count {
            let lane = i % LANE_COUNT;
            let row = (i / LANE_COUNT) as f64;
            let x = -(row * ROW_GAP + FIRST_ROW_OFFSET);
            let color = PALETTE[i % PALETTE.len()].to_string();
            cars.push(Car::autonomous(x, lane_y(lane), color, &mut rng));
        }

        Self {
            cars,
            camera_x: -PLAYER_SCREEN_X,
            ticks: 0,
            status: Status::Ongoing,
            logs: Vec::new(),
            rng,
        }
    }

    /// Advances every car exactly once (the player sees `input`, the
    /// autonomous cars see nothing), recomputes the camera, logs the tick
    /// and resolves the terminal status. Callers must stop ticking once a
    /// terminal status comes back; the simulation never auto-resets.
    pub fn tick(&mut self, input: &ControlInput) -> Status {
        assert!(
            self.status == Status::Ongoing,
            "simulation already finished"
        );

        for car in &mut self.cars {
            let input = car.is_player.then_some(input);
            car.update(input, &mut self.rng);
        }

        self.ticks += 1;
        self.camera_x = self.player().x - PLAYER_SCREEN_X;
        self.log_tick();

        self.status = if self.player().alive {
            if self.alive_opponents() == 0 {
                Status::AllOpponentsEliminated
            } else {
                Status::Ongoing
            }
        } else {
            Status::PlayerEliminated
        };
        self.status
    }

    fn player(&self) -> &Car {
        // The grid is built with the player at index 0.
        &self.cars[0]
    }

    /// Ordered per-car snapshots for the renderer, player first.
    pub fn cars(&self) -> Vec<CarSnapshot> {
        self.cars.iter().map(Car::snapshot).collect()
    }

    pub const fn camera_x(&self) -> f64 {
        self.camera_x
    }

    /// Player speed rounded to one decimal, ready for the HUD.
    pub fn player_speed(&self) -> f64 {
        (self.player().speed * 10.0).round() / 10.0
    }

    pub fn alive_opponents(&self) -> usize {
        self.cars.iter().filter(|c| c.alive && !c.is_player).count()
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    fn log_tick(&mut self) {
        self.logs.push(Log {
            tick: self.ticks,
            cars: self.cars(),
            player_speed: self.player_speed(),
            alive_opponents: self.alive_opponents(),
        });
    }

    /// Dumps the whole race log plus the final status to stdout and to
    /// `logs/logs_<unix-ts>.json`.
    pub fn export_log(&self) -> Result<()> {
        let json = serde_json::json!({"logs": self.logs, "status": self.status});

        println!("{json}");

        let time_now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs();

        std::fs::create_dir_all("logs")?;
        let filename = format!("logs/logs_{time_now}.json");
        File::create(filename)?.write_all(json.to_string().as_bytes())?;
        Ok(())
    }
}
