//! Input workbook schema and ingestion.
//!
//! `load_deck` reads the fixed named sheets of the input workbook into a
//! fully typed [`Deck`]. Two things happen here and nowhere else:
//!
//! * handedness reconciliation — the global (`GRS`) flip of vessel Y and
//!   heading and the vessel-local (`VRS`) flip of fairlead Y are applied at
//!   ingestion, so every downstream consumer sees one canonical
//!   right-handed frame;
//! * slot-group flattening — the repeating attachment/section column groups
//!   of the mooring-line sheet become ordered typed records, consuming
//!   exactly the counts the row declares.
//!
//! Schema problems surface as [`SchemaError`] with the sheet and
//! column/key named, before any engine call is made.

mod cells;
mod sheets;

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::frame::{
    DirectionReference, FrameConfig, LongitudinalDir, LongitudinalRef, RotationSense, VerticalRef,
};
use crate::paths;

pub const SHEET_GENERAL: &str = "General";
pub const SHEET_VESSEL: &str = "Ves_Gen";
pub const SHEET_AREAS: &str = "Ves_Area";
pub const SHEET_CURRENT_COEFFS: &str = "Ves_Curr";
pub const SHEET_WIND_COEFFS: &str = "Ves_Wind";
pub const SHEET_FAIRLEADS: &str = "Ves_FL";
pub const SHEET_LINE_TYPES: &str = "Line_Types";
pub const SHEET_CLUMP_TYPES: &str = "Clump_Buoy";
pub const SHEET_MOORING_LINES: &str = "Moor_Lines";
pub const SHEET_INTACT_CASES: &str = "IntactCases";
pub const SHEET_DAMAGE_CASES: &str = "DamageCases";

#[derive(Debug)]
pub enum SchemaError {
    Workbook(calamine::Error),
    MissingSheet(String),
    MissingColumn { sheet: String, column: String },
    MissingKey { sheet: String, key: String },
    BadValue {
        sheet: String,
        context: String,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workbook(err) => write!(f, "failed to read input workbook: {err}"),
            Self::MissingSheet(sheet) => write!(f, "input workbook has no sheet '{sheet}'"),
            Self::MissingColumn { sheet, column } => {
                write!(f, "sheet '{sheet}' has no column '{column}'")
            }
            Self::MissingKey { sheet, key } => {
                write!(f, "sheet '{sheet}' has no entry for '{key}'")
            }
            Self::BadValue {
                sheet,
                context,
                value,
                expected,
            } => write!(
                f,
                "sheet '{sheet}', {context}: '{value}' is not {expected}"
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// General sheet: global frame, location and water depth.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralSpec {
    pub frame: FrameConfig,
    pub location_tag: String,
    pub water_depth: f64,
    /// Low/wave-frequency dividing period for the vessel response setup.
    pub dividing_period: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GyradiusSet {
    pub kxx: f64,
    pub kyy: f64,
    pub kzz: f64,
    pub kxy: f64,
    pub kyz: f64,
    pub kxz: f64,
}

/// Vessel identity, dimensions, mass properties and canonical pose.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselSpec {
    pub tag: String,
    pub type_name: String,
    pub name: String,
    pub length: f64,
    pub breadth: f64,
    pub depth: f64,
    pub draft: f64,
    pub mass: f64,
    pub gyradius: GyradiusSet,
    pub centre_of_mass: [f64; 3],
    /// Global position, canonical frame.
    pub position: [f64; 3],
    pub heel_deg: f64,
    pub trim_deg: f64,
    /// Canonical heading.
    pub heading_deg: f64,
    pub xref: LongitudinalRef,
    pub xdir: LongitudinalDir,
    pub zref: VerticalRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadAreaSpec {
    pub surge_area: f64,
    pub sway_area: f64,
    pub heave_area: f64,
    pub roll_moment: f64,
    pub pitch_moment: f64,
    pub yaw_moment: f64,
    pub origin: [f64; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaSheet {
    pub current: LoadAreaSpec,
    pub wind: LoadAreaSpec,
}

/// One row of a wind/current coefficient curve.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionCoefficients {
    pub direction_deg: f64,
    pub surge: f64,
    pub sway: f64,
    pub heave: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineTypeSpec {
    pub name: String,
    /// Derive mechanical properties from the manufacturer wizard.
    pub wizard: bool,
    pub family: String,
    pub construction: String,
    pub nominal_diameter: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClumpTypeSpec {
    pub name: String,
    pub mass: f64,
    pub volume: f64,
    pub height: f64,
    pub offset: f64,
}

/// How a line's End B terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndTermination {
    Anchored,
    Fixed,
    /// Connected to a named structure.
    Connected(String),
}

impl EndTermination {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "" => None,
            "Anchored" => Some(Self::Anchored),
            "Fixed" => Some(Self::Fixed),
            other => Some(Self::Connected(other.to_string())),
        }
    }

    pub fn connection_label(&self) -> &str {
        match self {
            Self::Anchored => "Anchored",
            Self::Fixed => "Fixed",
            Self::Connected(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpec {
    pub line_type: String,
    pub length: f64,
    pub target_segment_length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentSpec {
    pub clump_type: String,
    /// Arc length measured from End B.
    pub offset_from_end_b: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MooringLineSpec {
    pub name: String,
    pub fairlead_id: String,
    pub end_b: EndTermination,
    pub horizontal_distance: f64,
    pub azimuth_deg: f64,
    pub vertical_position: f64,
    /// Target effective tension at End A, when the line is length-adjusted.
    pub pretension: Option<f64>,
    pub sections: Vec<SectionSpec>,
    pub attachments: Vec<AttachmentSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveSpec {
    pub wave_type: String,
    pub hs: f64,
    pub tp: f64,
    pub gamma: f64,
}

impl WaveSpec {
    /// Spectral parameterizations take Hs/Tp/gamma; the rest take a
    /// deterministic height and period.
    pub fn is_spectral(&self) -> bool {
        matches!(self.wave_type.as_str(), "JONSWAP" | "ISSC")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseSpec {
    pub id: String,
    pub direction_ref: DirectionReference,
    pub sense: RotationSense,
    pub nominal_direction_deg: f64,
    pub wave: WaveSpec,
    pub wind_speed: f64,
    pub current_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageCaseSpec {
    pub case: CaseSpec,
    /// Line removed from the model before re-solving.
    pub removed_line: String,
}

/// The fully parsed input workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub general: GeneralSpec,
    pub vessel: VesselSpec,
    pub areas: AreaSheet,
    pub current_coeffs: Vec<DirectionCoefficients>,
    pub wind_coeffs: Vec<DirectionCoefficients>,
    /// Fairlead id -> canonical vessel-local position.
    pub fairleads: BTreeMap<String, [f64; 3]>,
    pub line_types: Vec<LineTypeSpec>,
    pub clump_types: Vec<ClumpTypeSpec>,
    pub lines: Vec<MooringLineSpec>,
    pub intact_cases: Vec<CaseSpec>,
    pub damage_cases: Vec<DamageCaseSpec>,
}

impl Deck {
    /// `{vesselTag}_{locationTag}`, sanitized, shared by all artifact names.
    pub fn base_name(&self) -> String {
        paths::base_name(&self.vessel.tag, &self.general.location_tag)
    }
}

fn sheet_rows(
    workbook: &mut Sheets<BufReader<File>>,
    name: &str,
) -> Result<Vec<Vec<Data>>, SchemaError> {
    if !workbook.sheet_names().iter().any(|sheet| sheet == name) {
        return Err(SchemaError::MissingSheet(name.to_string()));
    }
    let range = workbook
        .worksheet_range(name)
        .map_err(SchemaError::Workbook)?;
    Ok(range.rows().map(|row| row.to_vec()).collect())
}

/// Read and type-check the whole workbook.
pub fn load_deck(path: &Path) -> Result<Deck, SchemaError> {
    let mut workbook = open_workbook_auto(path).map_err(SchemaError::Workbook)?;

    let general = sheets::parse_general(&sheet_rows(&mut workbook, SHEET_GENERAL)?)?;
    let (vessel, vrs) = sheets::parse_vessel(
        &sheet_rows(&mut workbook, SHEET_VESSEL)?,
        general.frame.global_handedness,
    )?;
    let areas = sheets::parse_areas(&sheet_rows(&mut workbook, SHEET_AREAS)?)?;
    let current_coeffs = sheets::parse_direction_coeffs(
        SHEET_CURRENT_COEFFS,
        &sheet_rows(&mut workbook, SHEET_CURRENT_COEFFS)?,
    )?;
    let wind_coeffs = sheets::parse_direction_coeffs(
        SHEET_WIND_COEFFS,
        &sheet_rows(&mut workbook, SHEET_WIND_COEFFS)?,
    )?;
    let fairleads = sheets::parse_fairleads(&sheet_rows(&mut workbook, SHEET_FAIRLEADS)?, vrs)?;
    let line_types = sheets::parse_line_types(&sheet_rows(&mut workbook, SHEET_LINE_TYPES)?)?;
    let clump_types = sheets::parse_clump_types(&sheet_rows(&mut workbook, SHEET_CLUMP_TYPES)?)?;
    let lines = sheets::parse_mooring_lines(&sheet_rows(&mut workbook, SHEET_MOORING_LINES)?)?;
    let intact_cases =
        sheets::parse_intact_cases(&sheet_rows(&mut workbook, SHEET_INTACT_CASES)?)?;
    let damage_cases =
        sheets::parse_damage_cases(&sheet_rows(&mut workbook, SHEET_DAMAGE_CASES)?)?;

    Ok(Deck {
        general,
        vessel,
        areas,
        current_coeffs,
        wind_coeffs,
        fairleads,
        line_types,
        clump_types,
        lines,
        intact_cases,
        damage_cases,
    })
}
