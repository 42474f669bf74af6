//! Phase 1: build the intact model from the input workbook and solve its
//! static equilibrium. Reads `Input.xlsx`, writes the INTACT artifacts.

use std::error::Error;
use std::path::Path;

use spreadmoor::engine::rpc::RpcEngine;
use spreadmoor::{input, model, paths};

fn main() -> Result<(), Box<dyn Error>> {
    let deck = input::load_deck(Path::new(paths::INPUT_FILE))?;
    let mut engine = RpcEngine::from_env()?;

    let artifacts = model::build_model(&deck, &mut engine, Path::new("."))?;
    println!("Wrote {}", artifacts.base_model.display());
    println!("Wrote {}", artifacts.static_state.display());
    Ok(())
}
