//! Model Builder: one complete vessel + mooring model and one solved
//! static state from a parsed deck.
//!
//! Construction follows dependency order: analysis data and calm
//! environment, vessel type (hull, mass, load coefficients), vessel
//! instance, line-type and clump-type catalogs, mooring lines. The unsolved
//! snapshot persists before the pretension pass so the base model is
//! reproducible independent of the solver.

pub mod hull;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::engine::{Engine, EngineError, ObjectKind, ENVIRONMENT, GENERAL};
use crate::frame::{resolve_end_b_position, resolve_vertex_extents};
use crate::input::{Deck, EndTermination, LineTypeSpec, LoadAreaSpec, DirectionCoefficients};
use crate::paths;

#[derive(Debug)]
pub enum BuildError {
    Engine(EngineError),
    Io(std::io::Error),
    UnknownFairlead { line: String, fairlead: String },
    UnknownLineType { line: String, line_type: String },
    UnknownClumpType { line: String, clump_type: String },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "filesystem failure during build: {err}"),
            Self::UnknownFairlead { line, fairlead } => {
                write!(f, "line '{line}' references unknown fairlead '{fairlead}'")
            }
            Self::UnknownLineType { line, line_type } => {
                write!(f, "line '{line}' references unknown line type '{line_type}'")
            }
            Self::UnknownClumpType { line, clump_type } => {
                write!(f, "line '{line}' references unknown clump type '{clump_type}'")
            }
        }
    }
}

impl std::error::Error for BuildError {}

impl From<EngineError> for BuildError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl From<std::io::Error> for BuildError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// The two artifacts a successful build persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifacts {
    /// Unsolved base model snapshot.
    pub base_model: PathBuf,
    /// Equilibrium-solved static state, input to every later phase.
    pub static_state: PathBuf,
}

/// Build the intact model and solve its static equilibrium.
pub fn build_model<E: Engine>(
    deck: &Deck,
    engine: &mut E,
    root: &Path,
) -> Result<BuildArtifacts, BuildError> {
    let base = deck.base_name();
    paths::recreate_dir(&root.join(paths::INTACT_DIR))?;

    engine.reset()?;
    configure_general(engine)?;
    configure_calm_environment(deck, engine)?;
    create_vessel_type(deck, engine)?;
    create_vessel(deck, engine)?;
    create_line_types(deck, engine)?;
    create_clump_types(deck, engine)?;
    create_mooring_lines(deck, engine)?;

    let base_model = paths::init_setup_path(root, &base);
    engine.save_model(&base_model)?;

    let any_pretension = configure_line_setup(deck, engine)?;
    if any_pretension {
        // Pretension matching assumes a fixed vessel.
        engine.set_text(&deck.vessel.name, "IncludedInStatics", "None")?;
        engine.run_line_setup()?;
        engine.set_text(&deck.vessel.name, "IncludedInStatics", "6 DOF")?;
    }

    engine.solve_statics()?;
    let static_state = paths::intact_statics_path(root, &base);
    engine.save_simulation(&static_state)?;

    Ok(BuildArtifacts {
        base_model,
        static_state,
    })
}

fn configure_general<E: Engine>(engine: &mut E) -> Result<(), EngineError> {
    engine.set_text(GENERAL, "DynamicsSolutionMethod", "Implicit time domain")?;
    engine.set_num(GENERAL, "StageCount", 2.0)?;
    engine.set_num_at(GENERAL, "StageDuration", 0, 8.0)?;
    engine.set_num_at(GENERAL, "StageDuration", 1, 3600.0)?;
    Ok(())
}

fn configure_calm_environment<E: Engine>(deck: &Deck, engine: &mut E) -> Result<(), EngineError> {
    engine.set_num(ENVIRONMENT, "WaterDepth", deck.general.water_depth)?;
    engine.set_num(ENVIRONMENT, "NumberOfWaveTrains", 1.0)?;
    engine.set_num(ENVIRONMENT, "WaveDirection", 0.0)?;
    engine.set_num(ENVIRONMENT, "WaveHeight", 0.0)?;
    engine.set_text(ENVIRONMENT, "WaveType", "Airy")?;
    engine.set_num(ENVIRONMENT, "RefCurrentSpeed", 0.0)?;
    engine.set_num(ENVIRONMENT, "RefCurrentDirection", 0.0)?;
    engine.set_num(ENVIRONMENT, "WindSpeed", 0.0)?;
    engine.set_num(ENVIRONMENT, "WindDirection", 0.0)?;
    Ok(())
}

fn create_vessel_type<E: Engine>(deck: &Deck, engine: &mut E) -> Result<(), EngineError> {
    let vessel = &deck.vessel;
    let vt = vessel.type_name.as_str();
    let gyradius = &vessel.gyradius;

    engine.create_object(ObjectKind::VesselType, vt)?;
    engine.set_num(vt, "Length", vessel.length)?;
    engine.set_num(vt, "Mass", vessel.mass)?;

    // All six tensor entries come from squared gyradii, the off-diagonal
    // terms included, matching how the input sheet quotes them.
    engine.set_num_at(vt, "MomentOfInertiaTensorX", 0, vessel.mass * gyradius.kxx.powi(2))?;
    engine.set_num_at(vt, "MomentOfInertiaTensorY", 1, vessel.mass * gyradius.kyy.powi(2))?;
    engine.set_num_at(vt, "MomentOfInertiaTensorZ", 2, vessel.mass * gyradius.kzz.powi(2))?;
    engine.set_num_at(vt, "MomentOfInertiaTensorY", 0, vessel.mass * gyradius.kxy.powi(2))?;
    engine.set_num_at(vt, "MomentOfInertiaTensorZ", 1, vessel.mass * gyradius.kyz.powi(2))?;
    engine.set_num_at(vt, "MomentOfInertiaTensorZ", 0, vessel.mass * gyradius.kxz.powi(2))?;

    engine.set_num(vt, "CentreOfMassX", vessel.centre_of_mass[0])?;
    engine.set_num(vt, "CentreOfMassY", vessel.centre_of_mass[1])?;
    engine.set_num(vt, "CentreOfMassZ", vessel.centre_of_mass[2])?;

    engine.set_num(vt, "StiffnessInertiaDampingRefOriginx", vessel.length / 2.0)?;
    engine.set_num(vt, "StiffnessInertiaDampingRefOriginy", 0.0)?;
    engine.set_num(vt, "StiffnessInertiaDampingRefOriginz", vessel.draft)?;
    engine.set_num(vt, "HydrostaticReferenceOriginDatumPositionz", 0.0)?;
    engine.set_num(vt, "HydrostaticReferenceOriginDatumOrientationx", 0.0)?;
    engine.set_num(vt, "HydrostaticReferenceOriginDatumOrientationy", 0.0)?;

    engine.set_text(vt, "WireFrameType", "Edges")?;
    let extents = resolve_vertex_extents(
        vessel.length,
        vessel.breadth,
        vessel.depth,
        vessel.draft,
        vessel.xref,
        vessel.xdir,
        vessel.zref,
    );
    let vertices = hull::hull_vertices(&extents);
    engine.set_num(vt, "NumberOfVertices", vertices.len() as f64)?;
    for (index, vertex) in vertices.iter().enumerate() {
        engine.set_num_at(vt, "VertexX", index, vertex[0])?;
        engine.set_num_at(vt, "VertexY", index, vertex[1])?;
        engine.set_num_at(vt, "VertexZ", index, vertex[2])?;
    }
    engine.set_num(vt, "NumberOfEdges", hull::HULL_EDGES.len() as f64)?;
    for (index, (from, to)) in hull::HULL_EDGES.iter().enumerate() {
        engine.set_num_at(vt, "EdgeFrom", index, f64::from(*from))?;
        engine.set_num_at(vt, "EdgeTo", index, f64::from(*to))?;
    }

    set_load_area(engine, vt, "Current", &deck.areas.current)?;
    set_load_area(engine, vt, "Wind", &deck.areas.wind)?;
    set_coefficient_curve(engine, vt, "Current", &deck.current_coeffs)?;
    set_coefficient_curve(engine, vt, "Wind", &deck.wind_coeffs)?;
    Ok(())
}

fn set_load_area<E: Engine>(
    engine: &mut E,
    vessel_type: &str,
    prefix: &str,
    area: &LoadAreaSpec,
) -> Result<(), EngineError> {
    engine.set_num(vessel_type, &format!("{prefix}CoeffSurgeArea"), area.surge_area)?;
    engine.set_num(vessel_type, &format!("{prefix}CoeffSwayArea"), area.sway_area)?;
    engine.set_num(vessel_type, &format!("{prefix}CoeffHeaveArea"), area.heave_area)?;
    engine.set_num(vessel_type, &format!("{prefix}CoeffRollAreaMoment"), area.roll_moment)?;
    engine.set_num(vessel_type, &format!("{prefix}CoeffPitchAreaMoment"), area.pitch_moment)?;
    engine.set_num(vessel_type, &format!("{prefix}CoeffYawAreaMoment"), area.yaw_moment)?;
    engine.set_num(vessel_type, &format!("{prefix}CoeffOriginX"), area.origin[0])?;
    engine.set_num(vessel_type, &format!("{prefix}CoeffOriginY"), area.origin[1])?;
    engine.set_num(vessel_type, &format!("{prefix}CoeffOriginZ"), area.origin[2])?;
    Ok(())
}

fn set_coefficient_curve<E: Engine>(
    engine: &mut E,
    vessel_type: &str,
    prefix: &str,
    coefficients: &[DirectionCoefficients],
) -> Result<(), EngineError> {
    // Curves are given for one side of the centreline plane.
    engine.set_text(vessel_type, &format!("{prefix}CoeffSymmetry"), "xz plane")?;
    engine.set_num(
        vessel_type,
        &format!("NumberOf{prefix}CoeffDirections"),
        coefficients.len() as f64,
    )?;
    for (index, row) in coefficients.iter().enumerate() {
        engine.set_num_at(vessel_type, &format!("{prefix}CoeffDirection"), index, row.direction_deg)?;
        engine.set_num_at(vessel_type, &format!("{prefix}CoeffSurge"), index, row.surge)?;
        engine.set_num_at(vessel_type, &format!("{prefix}CoeffSway"), index, row.sway)?;
        engine.set_num_at(vessel_type, &format!("{prefix}CoeffHeave"), index, row.heave)?;
        engine.set_num_at(vessel_type, &format!("{prefix}CoeffRoll"), index, row.roll)?;
        engine.set_num_at(vessel_type, &format!("{prefix}CoeffPitch"), index, row.pitch)?;
        engine.set_num_at(vessel_type, &format!("{prefix}CoeffYaw"), index, row.yaw)?;
    }
    Ok(())
}

fn create_vessel<E: Engine>(deck: &Deck, engine: &mut E) -> Result<(), EngineError> {
    let vessel = &deck.vessel;
    let name = vessel.name.as_str();
    engine.create_object(ObjectKind::Vessel, name)?;
    engine.set_text(name, "Type", &vessel.type_name)?;
    engine.set_text(name, "Connection", "Free")?;
    engine.set_num(name, "InitialX", vessel.position[0])?;
    engine.set_num(name, "InitialY", vessel.position[1])?;
    engine.set_num(name, "InitialZ", vessel.position[2])?;
    engine.set_num(name, "InitialHeel", vessel.heel_deg)?;
    engine.set_num(name, "InitialTrim", vessel.trim_deg)?;
    engine.set_num(name, "InitialHeading", vessel.heading_deg)?;
    engine.set_text(name, "IncludedInStatics", "6 DOF")?;
    Ok(())
}

fn create_line_types<E: Engine>(deck: &Deck, engine: &mut E) -> Result<(), EngineError> {
    for line_type in &deck.line_types {
        engine.create_object(ObjectKind::LineType, &line_type.name)?;
        if line_type.wizard {
            invoke_line_wizard(engine, line_type)?;
        }
    }
    Ok(())
}

fn invoke_line_wizard<E: Engine>(
    engine: &mut E,
    line_type: &LineTypeSpec,
) -> Result<(), EngineError> {
    let name = line_type.name.as_str();
    let family = line_type.family.to_lowercase();
    if family.contains("rope") || family.contains("wire") {
        engine.set_text(name, "WizardCalculation", &line_type.family)?;
        engine.set_num(name, "RopeNominalDiameter", line_type.nominal_diameter)?;
        engine.set_text(name, "RopeConstruction", &line_type.construction)?;
        engine.invoke_wizard(name)?;
    }
    if family.contains("chain") {
        engine.set_text(name, "WizardCalculation", &line_type.family)?;
        engine.set_num(name, "ChainBarDiameter", line_type.nominal_diameter)?;
        engine.set_text(name, "ChainLinkType", &line_type.construction)?;
        engine.invoke_wizard(name)?;
    }
    Ok(())
}

fn create_clump_types<E: Engine>(deck: &Deck, engine: &mut E) -> Result<(), EngineError> {
    for clump in &deck.clump_types {
        let name = clump.name.as_str();
        engine.create_object(ObjectKind::ClumpType, name)?;
        engine.set_num(name, "Mass", clump.mass)?;
        engine.set_num(name, "Volume", clump.volume)?;
        engine.set_num(name, "Height", clump.height)?;
        engine.set_num(name, "Offset", clump.offset)?;
        engine.set_text(name, "AlignWith", "Global axes")?;
        engine.set_num(name, "PenWidth", 10.0)?;
    }
    Ok(())
}

fn create_mooring_lines<E: Engine>(deck: &Deck, engine: &mut E) -> Result<(), BuildError> {
    let line_type_names: HashSet<&str> =
        deck.line_types.iter().map(|t| t.name.as_str()).collect();
    let clump_type_names: HashSet<&str> =
        deck.clump_types.iter().map(|t| t.name.as_str()).collect();

    for line in &deck.lines {
        let fairlead = deck
            .fairleads
            .get(&line.fairlead_id)
            .copied()
            .ok_or_else(|| BuildError::UnknownFairlead {
                line: line.name.clone(),
                fairlead: line.fairlead_id.clone(),
            })?;

        let name = line.name.as_str();
        engine.create_object(ObjectKind::Line, name)?;
        engine.set_text(name, "IncludeTorsion", "No")?;
        engine.set_text(name, "TopEnd", "End A")?;
        engine.set_text(name, "Representation", "Finite element")?;
        engine.set_text(name, "LengthAndEndOrientations", "Explicit")?;

        engine.set_text(name, "EndAConnection", &deck.vessel.name)?;
        engine.set_num(name, "EndAX", fairlead[0])?;
        engine.set_num(name, "EndAY", fairlead[1])?;
        engine.set_num(name, "EndAZ", fairlead[2])?;

        engine.set_text(name, "EndBConnection", line.end_b.connection_label())?;
        let end_b = resolve_end_b_position(
            fairlead,
            line.horizontal_distance,
            line.azimuth_deg,
            deck.vessel.heading_deg,
            deck.vessel.position,
        );
        engine.set_num(name, "EndBX", end_b[0])?;
        engine.set_num(name, "EndBY", end_b[1])?;
        engine.set_num(name, "EndBZ", 0.0)?;
        match &line.end_b {
            EndTermination::Anchored => {
                engine.set_num(
                    name,
                    "EndBHeightAboveSeabed",
                    line.vertical_position + deck.general.water_depth,
                )?;
            }
            EndTermination::Fixed => {
                engine.set_num(name, "EndBZ", line.vertical_position)?;
            }
            EndTermination::Connected(_) => {}
        }

        engine.set_num(name, "NumberOfSections", line.sections.len() as f64)?;
        for (index, section) in line.sections.iter().enumerate() {
            if !line_type_names.contains(section.line_type.as_str()) {
                return Err(BuildError::UnknownLineType {
                    line: line.name.clone(),
                    line_type: section.line_type.clone(),
                });
            }
            engine.set_text_at(name, "LineType", index, &section.line_type)?;
            engine.set_num_at(name, "Length", index, section.length)?;
            engine.set_num_at(name, "TargetSegmentLength", index, section.target_segment_length)?;
        }

        engine.set_num(name, "NumberOfAttachments", line.attachments.len() as f64)?;
        for (index, attachment) in line.attachments.iter().enumerate() {
            if !clump_type_names.contains(attachment.clump_type.as_str()) {
                return Err(BuildError::UnknownClumpType {
                    line: line.name.clone(),
                    clump_type: attachment.clump_type.clone(),
                });
            }
            engine.set_text_at(name, "AttachmentType", index, &attachment.clump_type)?;
            engine.set_num_at(name, "AttachmentZ", index, attachment.offset_from_end_b)?;
            engine.set_text_at(name, "AttachmentZRelativeTo", index, "End B")?;
        }

        engine.set_text(name, "SetLayAzimuth", "Yes")?;
    }
    Ok(())
}

/// Configure the pretension pass; returns whether any line carries a
/// tension target.
fn configure_line_setup<E: Engine>(deck: &Deck, engine: &mut E) -> Result<bool, EngineError> {
    engine.set_text(GENERAL, "LineSetupCalculationMode", "Calculate line lengths")?;
    engine.set_num(GENERAL, "LineSetupMaxDamping", 20.0)?;
    engine.set_num(GENERAL, "LineSetupTolerance", 0.01)?;

    let mut any_target = false;
    for line in &deck.lines {
        let name = line.name.as_str();
        engine.set_text(name, "LineSetupIncluded", "Yes")?;
        match line.pretension {
            Some(target) => {
                any_target = true;
                engine.set_text(name, "LineSetupTargetVariable", "Tension")?;
                engine.set_text(name, "LineSetupLineEnd", "End A")?;
                engine.set_num(name, "LineSetupArclength", 0.0)?;
                engine.set_num(name, "LineSetupTargetValue", target)?;
            }
            None => engine.set_text(name, "LineSetupTargetVariable", "No target")?,
        }
    }
    Ok(any_target)
}
