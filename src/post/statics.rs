//! Static Post-Processor: end forces and vessel offsets from the solved
//! intact static state. Runs once, against the single static artifact, and
//! never mutates the model.

use std::fs;
use std::path::Path;

use crate::engine::Engine;
use crate::input::Deck;
use crate::paths;

use super::{tables, PostError, LINE_CHANNELS, VESSEL_CHANNELS};

pub const LINE_FORCES_FILE: &str = "intact_static_line_forces.csv";
pub const OFFSETS_FILE: &str = "intact_static_offsets.csv";

const LINE_FORCE_COLUMNS: [&str; 8] = [
    "End A - Effective Tension (kN)",
    "End A - GX force (kN)",
    "End A - GY force (kN)",
    "End A - GZ force (kN)",
    "End B - Effective Tension (kN)",
    "End B - GX force (kN)",
    "End B - GY force (kN)",
    "End B - GZ force (kN)",
];

const OFFSET_ROWS: [&str; 6] = ["X", "Y", "Z", "Roll", "Pitch", "Yaw"];

#[derive(Debug, Clone, PartialEq)]
pub struct StaticReport {
    /// Per line: the eight end-force channel values.
    pub line_forces: Vec<(String, [f64; 8])>,
    /// X, Y, Z, roll, pitch, yaw.
    pub vessel_offsets: [f64; 6],
}

/// Extract the intact static results and write the two output tables.
pub fn static_results<E: Engine>(
    deck: &Deck,
    engine: &mut E,
    root: &Path,
) -> Result<StaticReport, PostError> {
    let base = deck.base_name();
    engine.load_simulation(&paths::intact_statics_path(root, &base))?;

    let mut line_forces = Vec::with_capacity(deck.lines.len());
    for line in &deck.lines {
        let mut values = [0.0; 8];
        for (index, channel) in LINE_CHANNELS.iter().enumerate() {
            values[index] =
                engine.static_result(&line.name, channel.variable, Some(channel.end))?;
        }
        line_forces.push((line.name.clone(), values));
    }

    let mut vessel_offsets = [0.0; 6];
    for (index, variable) in VESSEL_CHANNELS.iter().enumerate() {
        vessel_offsets[index] = engine.static_result(&deck.vessel.name, variable, None)?;
    }

    let output = paths::output_dir(root);
    fs::create_dir_all(&output)?;

    let force_columns: Vec<String> = LINE_FORCE_COLUMNS.iter().map(|s| s.to_string()).collect();
    let force_rows: Vec<(String, Vec<f64>)> = line_forces
        .iter()
        .map(|(name, values)| (name.clone(), values.to_vec()))
        .collect();
    tables::write_table(
        &output.join(LINE_FORCES_FILE),
        "LINE",
        &force_columns,
        &force_rows,
    )?;

    let offset_rows: Vec<(String, Vec<f64>)> = OFFSET_ROWS
        .iter()
        .zip(vessel_offsets.iter())
        .map(|(label, value)| (label.to_string(), vec![*value]))
        .collect();
    tables::write_table(
        &output.join(OFFSETS_FILE),
        "OFFSET",
        &[deck.vessel.name.clone()],
        &offset_rows,
    )?;

    Ok(StaticReport {
        line_forces,
        vessel_offsets,
    })
}
