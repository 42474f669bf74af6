//! Case Generator: one dynamic-analysis artifact per intact case and per
//! single-line-damage case, all derived from the solved intact static
//! state.
//!
//! The vessel response block and the environment block are each one shared
//! function, applied identically for intact and damage cases. Damage cases
//! reload the pristine static artifact from disk every iteration; nothing
//! carries over from a previous case. A case failure is confined to that
//! case and recorded in the ledger; the batch keeps going.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, EngineError, ENVIRONMENT};
use crate::frame::resolve_case_direction;
use crate::input::{CaseSpec, DamageCaseSpec, Deck};
use crate::paths;

#[derive(Debug)]
pub enum CaseError {
    Engine(EngineError),
    Io(std::io::Error),
    Ledger(serde_json::Error),
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "filesystem failure during case generation: {err}"),
            Self::Ledger(err) => write!(f, "failed to encode case ledger: {err}"),
        }
    }
}

impl std::error::Error for CaseError {}

impl From<EngineError> for CaseError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl From<std::io::Error> for CaseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CaseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Ledger(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseKind {
    Intact,
    Damage,
}

/// One row of the per-case success/failure ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub case_id: String,
    pub kind: CaseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseLedger {
    pub generated_at: String,
    pub outcomes: Vec<CaseOutcome>,
}

impl CaseLedger {
    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.succeeded())
            .count()
    }
}

/// Generate every intact and damage artifact and persist the ledger.
///
/// Setup failures (loading the static state, recreating the damage
/// directory, writing the ledger) abort the run; per-case failures do not.
pub fn generate_cases<E: Engine>(
    deck: &Deck,
    engine: &mut E,
    root: &Path,
) -> Result<CaseLedger, CaseError> {
    let base = deck.base_name();
    let statics = paths::intact_statics_path(root, &base);
    let mut outcomes = Vec::new();

    engine.load_simulation(&statics)?;
    // Case-invariant: configured once for the whole intact loop.
    apply_vessel_response(engine, &deck.vessel.name, deck.general.dividing_period)?;

    for case in &deck.intact_cases {
        let artifact = paths::intact_dynamics_path(root, &base, &case.id);
        let result = run_intact_case(deck, engine, case, &artifact);
        outcomes.push(outcome_of(&case.id, CaseKind::Intact, &artifact, result));
    }

    paths::recreate_dir(&root.join(paths::DAMAGE_DIR))?;
    for damage in &deck.damage_cases {
        let artifact = paths::damage_dynamics_path(root, &base, &damage.case.id);
        let result = run_damage_case(deck, engine, damage, &statics, &artifact);
        outcomes.push(outcome_of(&damage.case.id, CaseKind::Damage, &artifact, result));
    }

    let ledger = CaseLedger {
        generated_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        outcomes,
    };
    fs::write(paths::ledger_path(root), serde_json::to_string_pretty(&ledger)?)?;
    Ok(ledger)
}

fn outcome_of(
    case_id: &str,
    kind: CaseKind,
    artifact: &Path,
    result: Result<(), EngineError>,
) -> CaseOutcome {
    match result {
        Ok(()) => CaseOutcome {
            case_id: case_id.to_string(),
            kind,
            artifact: Some(artifact.display().to_string()),
            error: None,
        },
        Err(err) => CaseOutcome {
            case_id: case_id.to_string(),
            kind,
            artifact: None,
            error: Some(err.to_string()),
        },
    }
}

fn run_intact_case<E: Engine>(
    deck: &Deck,
    engine: &mut E,
    case: &CaseSpec,
    artifact: &Path,
) -> Result<(), EngineError> {
    apply_environment(deck, engine, case)?;
    engine.solve_statics()?;
    engine.save_simulation(artifact)
}

fn run_damage_case<E: Engine>(
    deck: &Deck,
    engine: &mut E,
    damage: &DamageCaseSpec,
    statics: &Path,
    artifact: &Path,
) -> Result<(), EngineError> {
    // Always start from the persisted intact state, never from the
    // previous iteration's model.
    engine.load_simulation(statics)?;
    engine.destroy_object(&damage.removed_line)?;
    apply_vessel_response(engine, &deck.vessel.name, deck.general.dividing_period)?;
    apply_environment(deck, engine, &damage.case)?;
    engine.solve_statics()?;
    engine.save_simulation(artifact)
}

/// The full dynamic-response configuration of the vessel. Idempotent;
/// shared by the intact setup and every damage case.
fn apply_vessel_response<E: Engine>(
    engine: &mut E,
    vessel: &str,
    dividing_period: f64,
) -> Result<(), EngineError> {
    engine.set_text(vessel, "IncludedInStatics", "6 DOF")?;
    engine.set_text(vessel, "PrimaryMotion", "Calculated (6 DOF)")?;
    engine.set_text(vessel, "SuperimposedMotion", "None")?;
    engine.set_text(vessel, "IncludeAppliedLoads", "No")?;
    engine.set_text(vessel, "IncludeWaveLoad1stOrder", "Yes")?;
    engine.set_text(vessel, "IncludeWaveDriftLoad2ndOrder", "Yes")?;
    engine.set_text(vessel, "IncludeWaveDriftDamping", "Yes")?;
    engine.set_text(vessel, "IncludeSumFrequencyLoad", "No")?;
    engine.set_text(vessel, "IncludeAddedMassAndDamping", "Yes")?;
    engine.set_text(vessel, "IncludeManoeuvringLoad", "Yes")?;
    engine.set_text(vessel, "IncludeOtherDamping", "Yes")?;
    engine.set_text(vessel, "IncludeCurrentLoad", "Yes")?;
    engine.set_text(vessel, "IncludeWindLoad", "Yes")?;
    engine.set_text(vessel, "PrimaryMotionIsTreatedAs", "Both low and wave frequency")?;
    engine.set_num(vessel, "PrimaryMotionDividingPeriod", dividing_period)?;
    engine.set_text(vessel, "CalculationMode", "Filtering")?;
    engine.set_text(vessel, "CalculateHydrostaticStiffnessAnglesBy", "Orientation")?;
    Ok(())
}

/// Wave, wind and current for one case, all on the case's one resolved
/// direction.
fn apply_environment<E: Engine>(
    deck: &Deck,
    engine: &mut E,
    case: &CaseSpec,
) -> Result<(), EngineError> {
    let direction = resolve_case_direction(
        case.direction_ref,
        case.sense,
        case.nominal_direction_deg,
        &deck.general.frame,
        deck.vessel.heading_deg,
    );

    engine.set_num(ENVIRONMENT, "NumberOfWaveTrains", 1.0)?;
    engine.set_text(ENVIRONMENT, "WaveType", &case.wave.wave_type)?;
    engine.set_num(ENVIRONMENT, "WaveDirection", direction)?;
    if case.wave.is_spectral() {
        engine.set_num(ENVIRONMENT, "WaveHs", case.wave.hs)?;
        engine.set_num(ENVIRONMENT, "WaveTp", case.wave.tp)?;
        engine.set_num(ENVIRONMENT, "WaveGamma", case.wave.gamma)?;
    } else {
        engine.set_num(ENVIRONMENT, "WaveHeight", case.wave.hs)?;
        engine.set_num(ENVIRONMENT, "WavePeriod", case.wave.tp)?;
    }

    engine.set_num(ENVIRONMENT, "WindDirection", direction)?;
    engine.set_num(ENVIRONMENT, "WindSpeed", case.wind_speed)?;

    engine.set_num(ENVIRONMENT, "RefCurrentSpeed", case.current_speed)?;
    engine.set_num(ENVIRONMENT, "RefCurrentDirection", direction)?;
    Ok(())
}
