//! Dynamic Post-Processor: extreme-value statistics over every intact
//! dynamic artifact, aggregated into one table per statistic and channel.
//!
//! Five statistics per channel: most-probable maximum and minimum extreme
//! (two separate Rayleigh fits, upper and lower tail), the raw observed
//! extrema, and the RMS of the record. All queries span the whole simulated
//! duration and are answered by the engine; nothing is re-solved here.

use std::fs;
use std::path::Path;

use crate::engine::{Engine, EngineError, ExtremeTail, LineEnd, RayleighQuery};
use crate::input::Deck;
use crate::paths;

use super::{tables, PostError, LINE_CHANNELS, VESSEL_CHANNELS};

pub const STORM_DURATION_HOURS: f64 = 3.0;
pub const RISK_FACTOR: f64 = 1.0;

/// Label used for the aggregated vessel tables.
pub const VESSEL_TABLE_LABEL: &str = "VESSEL_EXCURSIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    MpvMax,
    MpvMin,
    Max,
    Min,
    Rms,
}

impl Statistic {
    pub const ALL: [Statistic; 5] = [
        Statistic::MpvMax,
        Statistic::MpvMin,
        Statistic::Max,
        Statistic::Min,
        Statistic::Rms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MpvMax => "MPV_MAX",
            Self::MpvMin => "MPV_MIN",
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Rms => "RMS",
        }
    }
}

/// One aggregated table: rows are case ids, columns are line names (line
/// channels) or vessel channel names.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTable {
    pub statistic: Statistic,
    pub channel: String,
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<f64>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicSummary {
    pub line_tables: Vec<ChannelTable>,
    pub vessel_tables: Vec<ChannelTable>,
}

/// Aggregate statistics across every intact dynamic artifact and write one
/// CSV per (statistic, channel).
pub fn dynamic_results<E: Engine>(
    deck: &Deck,
    engine: &mut E,
    root: &Path,
) -> Result<DynamicSummary, PostError> {
    let base = deck.base_name();
    let line_names: Vec<String> = deck.lines.iter().map(|line| line.name.clone()).collect();
    let vessel_columns: Vec<String> = VESSEL_CHANNELS.iter().map(|s| s.to_string()).collect();

    let mut line_tables: Vec<ChannelTable> = Vec::new();
    for statistic in Statistic::ALL {
        for channel in LINE_CHANNELS {
            line_tables.push(ChannelTable {
                statistic,
                channel: channel.label.to_string(),
                columns: line_names.clone(),
                rows: Vec::new(),
            });
        }
    }
    let mut vessel_tables: Vec<ChannelTable> = Statistic::ALL
        .iter()
        .map(|&statistic| ChannelTable {
            statistic,
            channel: VESSEL_TABLE_LABEL.to_string(),
            columns: vessel_columns.clone(),
            rows: Vec::new(),
        })
        .collect();

    for case in &deck.intact_cases {
        engine.load_simulation(&paths::intact_dynamics_path(root, &base, &case.id))?;

        // statistic-major, then channel, then line
        let channel_count = LINE_CHANNELS.len();
        let mut per_line: Vec<Vec<Vec<f64>>> =
            vec![vec![Vec::with_capacity(line_names.len()); channel_count]; Statistic::ALL.len()];
        for line in &line_names {
            for (channel_index, channel) in LINE_CHANNELS.iter().enumerate() {
                let values =
                    channel_statistics(engine, line, channel.variable, Some(channel.end))?;
                for (stat_index, value) in values.iter().enumerate() {
                    per_line[stat_index][channel_index].push(*value);
                }
            }
        }
        for stat_index in 0..Statistic::ALL.len() {
            for channel_index in 0..channel_count {
                line_tables[stat_index * channel_count + channel_index]
                    .rows
                    .push((case.id.clone(), per_line[stat_index][channel_index].clone()));
            }
        }

        let mut vessel_rows: Vec<Vec<f64>> =
            vec![Vec::with_capacity(VESSEL_CHANNELS.len()); Statistic::ALL.len()];
        for variable in VESSEL_CHANNELS {
            let values = channel_statistics(engine, &deck.vessel.name, variable, None)?;
            for (stat_index, value) in values.iter().enumerate() {
                vessel_rows[stat_index].push(*value);
            }
        }
        for (stat_index, row) in vessel_rows.into_iter().enumerate() {
            vessel_tables[stat_index].rows.push((case.id.clone(), row));
        }
    }

    let output = paths::output_dir(root);
    fs::create_dir_all(&output)?;
    for table in line_tables.iter().chain(vessel_tables.iter()) {
        let file = format!("{}_{}.csv", table.statistic.as_str(), table.channel);
        tables::write_table(&output.join(file), "CASE_ID", &table.columns, &table.rows)?;
    }

    Ok(DynamicSummary {
        line_tables,
        vessel_tables,
    })
}

/// The five statistics for one channel, in [`Statistic::ALL`] order.
fn channel_statistics<E: Engine>(
    engine: &mut E,
    object: &str,
    variable: &str,
    end: Option<LineEnd>,
) -> Result<[f64; 5], EngineError> {
    let mpv_max = engine.most_probable_extreme(
        object,
        variable,
        end,
        RayleighQuery {
            tail: ExtremeTail::Upper,
            storm_duration_hours: STORM_DURATION_HOURS,
            risk_factor: RISK_FACTOR,
        },
    )?;
    let mpv_min = engine.most_probable_extreme(
        object,
        variable,
        end,
        RayleighQuery {
            tail: ExtremeTail::Lower,
            storm_duration_hours: STORM_DURATION_HOURS,
            risk_factor: RISK_FACTOR,
        },
    )?;
    let extrema = engine.extrema(object, variable, end)?;
    let rms = engine.rms(object, variable, end)?;
    Ok([mpv_max, mpv_min, extrema.max, extrema.min, rms])
}
