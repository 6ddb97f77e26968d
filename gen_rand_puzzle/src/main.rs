use std::{env, error::Error, fs::File};

use reflector_json::serde_json;
use reflector_random::*;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("please provide a path to serialize the puzzle json data")?;

    let num_mirrors = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(12);

    let num_events = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(32);

    let puzzle = random_puzzle(&mut rand::thread_rng(), num_mirrors, num_events);

    serde_json::to_writer_pretty(
        File::create(file_path)?,
        &reflector_json::serialize_puzzle(&puzzle),
    )?;

    Ok(())
}
