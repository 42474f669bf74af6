//! Phase 4: aggregate extreme-value statistics over the executed intact
//! dynamic artifacts into one OUTPUT table per statistic and channel.

use std::error::Error;
use std::path::Path;

use spreadmoor::engine::rpc::RpcEngine;
use spreadmoor::post::dynamics::dynamic_results;
use spreadmoor::{input, paths};

fn main() -> Result<(), Box<dyn Error>> {
    let deck = input::load_deck(Path::new(paths::INPUT_FILE))?;
    let mut engine = RpcEngine::from_env()?;

    let summary = dynamic_results(&deck, &mut engine, Path::new("."))?;
    println!(
        "Wrote {} result table(s) to {}",
        summary.line_tables.len() + summary.vessel_tables.len(),
        paths::OUTPUT_DIR
    );
    Ok(())
}
