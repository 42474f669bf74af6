//! Phase 3: derive one dynamic-analysis artifact per intact case and per
//! single-line-damage case from the solved intact static state.

use std::error::Error;
use std::path::Path;
use std::process;

use spreadmoor::engine::rpc::RpcEngine;
use spreadmoor::{cases, input, paths};

fn main() -> Result<(), Box<dyn Error>> {
    let deck = input::load_deck(Path::new(paths::INPUT_FILE))?;
    let mut engine = RpcEngine::from_env()?;

    let ledger = cases::generate_cases(&deck, &mut engine, Path::new("."))?;
    for outcome in &ledger.outcomes {
        match (&outcome.artifact, &outcome.error) {
            (Some(artifact), _) => println!("{}: {}", outcome.case_id, artifact),
            (None, Some(error)) => eprintln!("{}: FAILED: {}", outcome.case_id, error),
            (None, None) => {}
        }
    }

    let failures = ledger.failure_count();
    if failures > 0 {
        eprintln!("{failures} case(s) failed; see {}", paths::LEDGER_FILE);
        process::exit(1);
    }
    println!("Generated {} case artifact(s)", ledger.outcomes.len());
    Ok(())
}
