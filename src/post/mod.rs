//! Post-processors: pure extraction over already-solved artifacts.

pub mod dynamics;
pub mod statics;
pub mod tables;

use std::fmt;

use crate::engine::{EngineError, LineEnd};

/// One extracted line response channel.
#[derive(Debug, Clone, Copy)]
pub struct LineChannel {
    pub variable: &'static str,
    pub end: LineEnd,
    pub label: &'static str,
}

/// Effective tension and the three global end-force components, both ends.
pub const LINE_CHANNELS: [LineChannel; 8] = [
    LineChannel { variable: "Effective Tension", end: LineEnd::EndA, label: "END_A_EFF_TEN" },
    LineChannel { variable: "End GX force", end: LineEnd::EndA, label: "END_A_GX_FORCE" },
    LineChannel { variable: "End GY force", end: LineEnd::EndA, label: "END_A_GY_FORCE" },
    LineChannel { variable: "End GZ force", end: LineEnd::EndA, label: "END_A_GZ_FORCE" },
    LineChannel { variable: "Effective Tension", end: LineEnd::EndB, label: "END_B_EFF_TEN" },
    LineChannel { variable: "End GX force", end: LineEnd::EndB, label: "END_B_GX_FORCE" },
    LineChannel { variable: "End GY force", end: LineEnd::EndB, label: "END_B_GY_FORCE" },
    LineChannel { variable: "End GZ force", end: LineEnd::EndB, label: "END_B_GZ_FORCE" },
];

/// Vessel translations and rotations, engine variable names.
pub const VESSEL_CHANNELS: [&str; 6] = ["X", "Y", "Z", "Rotation 1", "Rotation 2", "Rotation 3"];

#[derive(Debug)]
pub enum PostError {
    Engine(EngineError),
    Io(std::io::Error),
    Table(csv::Error),
}

impl fmt::Display for PostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "filesystem failure during post-processing: {err}"),
            Self::Table(err) => write!(f, "failed to write result table: {err}"),
        }
    }
}

impl std::error::Error for PostError {}

impl From<EngineError> for PostError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl From<std::io::Error> for PostError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for PostError {
    fn from(err: csv::Error) -> Self {
        Self::Table(err)
    }
}
