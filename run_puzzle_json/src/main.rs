use log::{debug, info};
use reflector::{BeamSet, LightBeam, ReflectionCtx, Vector};
use reflector_json::{deserialize_puzzle, serde_json, JsonSer};

use std::{error::Error, fs::File, io};

fn run_puzzle(json: &serde_json::Value) -> Result<BeamSet, Box<dyn Error>> {
    let mut puzzle = deserialize_puzzle(json)?;
    let mut beams = BeamSet::new();

    let mut ctx = ReflectionCtx::new(&mut beams).with_listener(|beam: &mut LightBeam| {
        info!("new beam {} from {:?}", beam.id(), beam.origin.as_slice());
    });

    for (event, reflection) in puzzle.replay(&mut ctx)?.iter().enumerate() {
        info!("event {event}: {reflection:?}");
    }

    let dark = beams
        .iter()
        .filter(|beam| beam.direction == Vector::zeros())
        .count();
    info!("{} beams, {dark} with no struck face", beams.len());

    for beam in &beams {
        debug!(
            "beam {}: {:?} -> {:?}",
            beam.id(),
            beam.origin.as_slice(),
            beam.direction.as_slice()
        );
    }

    Ok(beams)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let file_path = std::env::args()
        .nth(1)
        .ok_or("expected a file path as a first argument.")?;

    let beams = run_puzzle(&serde_json::from_reader(File::open(file_path)?)?)?;

    serde_json::to_writer_pretty(io::stdout().lock(), &beams.to_json())?;
    println!();

    Ok(())
}
