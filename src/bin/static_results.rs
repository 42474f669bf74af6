//! Phase 2: extract line end forces and vessel offsets from the solved
//! intact static artifact into the OUTPUT tables.

use std::error::Error;
use std::path::Path;

use spreadmoor::engine::rpc::RpcEngine;
use spreadmoor::post::statics::static_results;
use spreadmoor::{input, paths};

fn main() -> Result<(), Box<dyn Error>> {
    let deck = input::load_deck(Path::new(paths::INPUT_FILE))?;
    let mut engine = RpcEngine::from_env()?;

    let report = static_results(&deck, &mut engine, Path::new("."))?;
    println!(
        "Wrote static results for {} line(s) to {}",
        report.line_forces.len(),
        paths::OUTPUT_DIR
    );
    Ok(())
}
