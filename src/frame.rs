//! Coordinate-system and direction resolution.
//!
//! All internal geometry lives in a single canonical right-handed frame.
//! The sign flips that reconcile left-handed input conventions are applied
//! exactly once, at workbook ingestion (`canonical_y` / `canonical_heading`);
//! nothing downstream looks at handedness again. The resolvers here are pure
//! functions over an explicit [`FrameConfig`] rather than ambient state.

use serde::{Deserialize, Serialize};

/// Handedness of a reference system, global (`GRS`) or vessel-local (`VRS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Rhs,
    Lhs,
}

impl Handedness {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "RHS" => Some(Self::Rhs),
            "LHS" => Some(Self::Lhs),
            _ => None,
        }
    }
}

/// Global-frame configuration read once from the General sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    pub global_handedness: Handedness,
    /// Compass bearing of the global X axis, degrees.
    pub gx_bearing_deg: f64,
}

/// Longitudinal reference point for the hull extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongitudinalRef {
    ForePerpendicular,
    AftPerpendicular,
    Midships,
}

impl LongitudinalRef {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "FP" => Some(Self::ForePerpendicular),
            "AP" => Some(Self::AftPerpendicular),
            "MID" | "MIDSHIPS" => Some(Self::Midships),
            _ => None,
        }
    }
}

/// Direction in which local X grows along the hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongitudinalDir {
    Forward,
    Aft,
}

impl LongitudinalDir {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "FWD" => Some(Self::Forward),
            "AFT" => Some(Self::Aft),
            _ => None,
        }
    }
}

/// Vertical reference for the hull extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalRef {
    Baseline,
    Draft,
}

impl VerticalRef {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "BL" => Some(Self::Baseline),
            "DRAFT" => Some(Self::Draft),
            _ => None,
        }
    }
}

/// Reference frame a case direction is quoted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionReference {
    GlobalX,
    North,
    East,
    South,
    West,
    VesselForward,
    VesselAft,
}

impl DirectionReference {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "GLOBX" => Some(Self::GlobalX),
            "NORTH" => Some(Self::North),
            "EAST" => Some(Self::East),
            "SOUTH" => Some(Self::South),
            "WEST" => Some(Self::West),
            "VESX+" => Some(Self::VesselForward),
            "VESX-" => Some(Self::VesselAft),
            _ => None,
        }
    }
}

/// Rotation sense a case direction is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationSense {
    Clockwise,
    Anticlockwise,
}

impl RotationSense {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "CLOCKWISE" => Some(Self::Clockwise),
            "ANTICLOCKWISE" => Some(Self::Anticlockwise),
            _ => None,
        }
    }
}

/// Canonical (right-handed) Y for an input Y quoted in `handedness`.
pub fn canonical_y(y: f64, handedness: Handedness) -> f64 {
    match handedness {
        Handedness::Rhs => y,
        Handedness::Lhs => -y,
    }
}

/// Canonical (right-handed) heading for an input heading quoted in `handedness`.
pub fn canonical_heading(heading_deg: f64, handedness: Handedness) -> f64 {
    match handedness {
        Handedness::Rhs => heading_deg,
        Handedness::Lhs => 360.0 - heading_deg,
    }
}

/// The six hull-extent scalars produced by the reference-convention
/// decision table. `x_fwd > x_aft` in the local sense defined by the
/// longitudinal direction, whichever reference point defines the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexExtents {
    pub x_aft: f64,
    pub x_fwd: f64,
    pub y_port: f64,
    pub y_stbd: f64,
    pub z_baseline: f64,
    pub z_main_deck: f64,
}

pub fn resolve_vertex_extents(
    length: f64,
    breadth: f64,
    depth: f64,
    draft: f64,
    xref: LongitudinalRef,
    xdir: LongitudinalDir,
    zref: VerticalRef,
) -> VertexExtents {
    let (x_aft, x_fwd) = match xref {
        LongitudinalRef::ForePerpendicular => match xdir {
            LongitudinalDir::Aft => (length, 0.0),
            LongitudinalDir::Forward => (-length, 0.0),
        },
        LongitudinalRef::AftPerpendicular => match xdir {
            LongitudinalDir::Forward => (0.0, length),
            LongitudinalDir::Aft => (0.0, -length),
        },
        LongitudinalRef::Midships => match xdir {
            LongitudinalDir::Forward => (-length / 2.0, length / 2.0),
            LongitudinalDir::Aft => (length / 2.0, -length / 2.0),
        },
    };

    let (y_port, y_stbd) = match xdir {
        LongitudinalDir::Forward => (breadth / 2.0, -breadth / 2.0),
        LongitudinalDir::Aft => (-breadth / 2.0, breadth / 2.0),
    };

    let (z_baseline, z_main_deck) = match zref {
        VerticalRef::Baseline => (0.0, depth),
        VerticalRef::Draft => (-draft, depth - draft),
    };

    VertexExtents {
        x_aft,
        x_fwd,
        y_port,
        y_stbd,
        z_baseline,
        z_main_deck,
    }
}

/// Global End-B position for a line: the vessel-relative polar offset from
/// the fairlead, rotated by the vessel heading, translated by the vessel
/// position. Z is left at zero; the caller sets it from the end termination.
pub fn resolve_end_b_position(
    fairlead: [f64; 3],
    horizontal_distance: f64,
    azimuth_deg: f64,
    vessel_heading_deg: f64,
    vessel_position: [f64; 3],
) -> [f64; 3] {
    let azimuth = azimuth_deg.to_radians();
    let heading = vessel_heading_deg.to_radians();

    let x_local = fairlead[0] + horizontal_distance * azimuth.cos();
    let y_local = fairlead[1] + horizontal_distance * azimuth.sin();

    let x_global = x_local * heading.cos() - y_local * heading.sin();
    let y_global = x_local * heading.sin() + y_local * heading.cos();

    [
        vessel_position[0] + x_global,
        vessel_position[1] + y_global,
        0.0,
    ]
}

/// Resolve a case direction into the canonical anticlockwise-from-global-X
/// convention, in [0, 360).
///
/// Stage 1 derives the lag angle of the quoted reference frame; stage 2
/// folds in the rotation sense and reduces modulo 360. Intact and damage
/// cases resolve through this one function.
pub fn resolve_case_direction(
    reference: DirectionReference,
    sense: RotationSense,
    nominal_deg: f64,
    frame: &FrameConfig,
    vessel_heading_deg: f64,
) -> f64 {
    let lag_deg = match reference {
        DirectionReference::GlobalX => 0.0,
        DirectionReference::North => frame.gx_bearing_deg,
        DirectionReference::East => frame.gx_bearing_deg - 90.0,
        DirectionReference::South => frame.gx_bearing_deg - 180.0,
        DirectionReference::West => frame.gx_bearing_deg - 270.0,
        DirectionReference::VesselForward => vessel_heading_deg,
        DirectionReference::VesselAft => vessel_heading_deg + 180.0,
    };

    let anticlockwise_deg = match sense {
        RotationSense::Anticlockwise => nominal_deg,
        RotationSense::Clockwise => 360.0 - nominal_deg,
    };

    (anticlockwise_deg + lag_deg).rem_euclid(360.0)
}
