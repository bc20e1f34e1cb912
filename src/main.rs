#![warn(clippy::all, clippy::pedantic, clippy::cargo, clippy::nursery)]

use color_eyre::Result;

use crate::control::ControlInput;
use crate::game::{Game, Status, DEFAULT_AI_COUNT};

mod car;
mod control;
mod game;
mod log;
mod track;

// Safety valve for the headless run; a neutral player never leaves the
// road, so the race can only end when the last opponent crashes out.
const MAX_TICKS: u64 = 100_000;

fn main() -> Result<()> {
    color_eyre::install()?;

    let mut args = std::env::args().skip(1);
    let ai_count = match args.next() {
        Some(n) => n.parse()?,
        None => DEFAULT_AI_COUNT,
    };
    let seed = args.next().map(|s| s.parse::<u64>()).transpose()?;

    let mut game = Game::new(ai_count, seed);
    let neutral = ControlInput::default();

    let mut status = Status::Ongoing;
    for _ in 0..MAX_TICKS {
        status = game.tick(&neutral);
        if status != Status::Ongoing {
            break;
        }
    }

    match status {
        Status::PlayerEliminated => println!("Game over! The player left the road"),
        Status::AllOpponentsEliminated => {
            println!(
                "Victory! Every opponent crashed out after {} ticks",
                game.ticks()
            );
        }
        Status::Ongoing => println!(
            "Race still running after {MAX_TICKS} ticks ({} opponents left)",
            game.alive_opponents()
        ),
    }

    game.export_log()?;
    Ok(())
}
