//! Capability-set interface to the external simulation engine.
//!
//! The pipeline never computes physics itself: object creation, the line
//! wizard, pretension matching, statics solving and result/statistics
//! queries are all invoked through [`Engine`]. Two implementations ship
//! with the crate: [`rpc::RpcEngine`] bridges to an engine adapter process,
//! [`mock::MockEngine`] is the deterministic backend the test suite runs
//! against.
//!
//! Object names address model entities. The pseudo-objects [`GENERAL`] and
//! [`ENVIRONMENT`] always exist and carry the model-wide analysis and
//! environment data.

pub mod mock;
pub mod rpc;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Model-wide analysis data (solution method, stages, line-setup settings).
pub const GENERAL: &str = "General";

/// The single environment entity (water depth, wave, wind, current).
pub const ENVIRONMENT: &str = "Environment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    VesselType,
    Vessel,
    LineType,
    ClumpType,
    Line,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VesselType => "VesselType",
            Self::Vessel => "Vessel",
            Self::LineType => "LineType",
            Self::ClumpType => "ClumpType",
            Self::Line => "Line",
        }
    }
}

/// The two terminations of a mooring line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineEnd {
    EndA,
    EndB,
}

impl LineEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndA => "End A",
            Self::EndB => "End B",
        }
    }
}

/// Which tail of the peak distribution an extreme-value fit analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtremeTail {
    Upper,
    Lower,
}

/// Parameters of a Rayleigh short-term extreme-value query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayleighQuery {
    pub tail: ExtremeTail,
    pub storm_duration_hours: f64,
    pub risk_factor: f64,
}

/// Raw extrema of a simulated time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extrema {
    pub max: f64,
    pub min: f64,
}

/// A scalar property value: the engine data model only distinguishes
/// numbers and text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug)]
pub enum EngineError {
    Io(std::io::Error),
    /// The adapter stream produced something that is not the protocol.
    Protocol(String),
    /// The engine rejected or failed an operation.
    Operation { op: String, message: String },
    UnknownObject(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "engine i/o failure: {err}"),
            Self::Protocol(msg) => write!(f, "engine protocol violation: {msg}"),
            Self::Operation { op, message } => write!(f, "engine operation '{op}' failed: {message}"),
            Self::UnknownObject(name) => write!(f, "no object named '{name}' in the model"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// The capability groups the pipeline needs from the simulation engine.
///
/// One engine session holds one current model; `reset` discards it and
/// `load_simulation` replaces it with a persisted state. Statistics queries
/// cover the whole simulated duration.
pub trait Engine {
    /// Discard the current model and start from an empty one.
    fn reset(&mut self) -> Result<(), EngineError>;

    fn load_simulation(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Persist the current model data (unsolved snapshot).
    fn save_model(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Persist the current simulation state (solved).
    fn save_simulation(&mut self, path: &Path) -> Result<(), EngineError>;

    fn create_object(&mut self, kind: ObjectKind, name: &str) -> Result<(), EngineError>;

    fn destroy_object(&mut self, name: &str) -> Result<(), EngineError>;

    fn set_property(
        &mut self,
        object: &str,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), EngineError>;

    fn set_property_at(
        &mut self,
        object: &str,
        property: &str,
        index: usize,
        value: PropertyValue,
    ) -> Result<(), EngineError>;

    /// Run the manufacturer-table property calculation on a catalog entry
    /// whose wizard inputs have been set.
    fn invoke_wizard(&mut self, object: &str) -> Result<(), EngineError>;

    /// Run the pretension-matching (line setup) procedure over the lines
    /// that currently carry a setup target.
    fn run_line_setup(&mut self) -> Result<(), EngineError>;

    fn solve_statics(&mut self) -> Result<(), EngineError>;

    fn static_result(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
    ) -> Result<f64, EngineError>;

    /// Most-probable extreme value from a Rayleigh fit of the requested tail.
    fn most_probable_extreme(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
        query: RayleighQuery,
    ) -> Result<f64, EngineError>;

    fn extrema(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
    ) -> Result<Extrema, EngineError>;

    fn rms(
        &mut self,
        object: &str,
        variable: &str,
        end: Option<LineEnd>,
    ) -> Result<f64, EngineError>;

    fn set_num(&mut self, object: &str, property: &str, value: f64) -> Result<(), EngineError> {
        self.set_property(object, property, PropertyValue::Number(value))
    }

    fn set_text(&mut self, object: &str, property: &str, value: &str) -> Result<(), EngineError> {
        self.set_property(object, property, PropertyValue::Text(value.to_string()))
    }

    fn set_num_at(
        &mut self,
        object: &str,
        property: &str,
        index: usize,
        value: f64,
    ) -> Result<(), EngineError> {
        self.set_property_at(object, property, index, PropertyValue::Number(value))
    }

    fn set_text_at(
        &mut self,
        object: &str,
        property: &str,
        index: usize,
        value: &str,
    ) -> Result<(), EngineError> {
        self.set_property_at(object, property, index, PropertyValue::Text(value.to_string()))
    }
}
