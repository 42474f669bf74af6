use std::collections::BTreeMap;
use std::fs;

use spreadmoor::cases::{generate_cases, CaseLedger};
use spreadmoor::engine::mock::MockEngine;
use spreadmoor::engine::{Engine, LineEnd, PropertyValue, ENVIRONMENT, GENERAL};
use spreadmoor::frame::{
    DirectionReference, FrameConfig, Handedness, LongitudinalDir, LongitudinalRef, RotationSense,
    VerticalRef,
};
use spreadmoor::input::{
    AreaSheet, AttachmentSpec, CaseSpec, ClumpTypeSpec, DamageCaseSpec, Deck,
    DirectionCoefficients, EndTermination, GeneralSpec, GyradiusSet, LineTypeSpec, LoadAreaSpec,
    MooringLineSpec, SectionSpec, VesselSpec, WaveSpec,
};
use spreadmoor::model::build_model;
use spreadmoor::paths;
use spreadmoor::post::dynamics::dynamic_results;
use spreadmoor::post::statics::static_results;

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

fn num(engine: &MockEngine, object: &str, property: &str) -> f64 {
    match engine.scalar(object, property) {
        Some(PropertyValue::Number(value)) => *value,
        other => panic!("expected number for {object}.{property}, got {other:?}"),
    }
}

fn text<'a>(engine: &'a MockEngine, object: &str, property: &str) -> &'a str {
    match engine.scalar(object, property) {
        Some(PropertyValue::Text(value)) => value,
        other => panic!("expected text for {object}.{property}, got {other:?}"),
    }
}

fn load_area(origin: [f64; 3]) -> LoadAreaSpec {
    LoadAreaSpec {
        surge_area: 900.0,
        sway_area: 4200.0,
        heave_area: 7800.0,
        roll_moment: 60000.0,
        pitch_moment: 320000.0,
        yaw_moment: 410000.0,
        origin,
    }
}

fn coefficient_rows() -> Vec<DirectionCoefficients> {
    [0.0, 90.0, 180.0]
        .into_iter()
        .map(|direction_deg| DirectionCoefficients {
            direction_deg,
            surge: 0.8,
            sway: 1.1,
            heave: 0.0,
            roll: 0.05,
            pitch: 0.1,
            yaw: 0.2,
        })
        .collect()
}

fn case(id: &str, reference: DirectionReference, sense: RotationSense, wave_type: &str) -> CaseSpec {
    CaseSpec {
        id: id.to_string(),
        direction_ref: reference,
        sense,
        nominal_direction_deg: if sense == RotationSense::Clockwise { 30.0 } else { 45.0 },
        wave: WaveSpec {
            wave_type: wave_type.to_string(),
            hs: if wave_type == "JONSWAP" { 4.5 } else { 3.0 },
            tp: if wave_type == "JONSWAP" { 9.0 } else { 8.0 },
            gamma: 2.0,
        },
        wind_speed: 18.0,
        current_speed: 0.9,
    }
}

fn sample_deck() -> Deck {
    let mut fairleads = BTreeMap::new();
    fairleads.insert("FL1".to_string(), [95.0, 18.0, 22.0]);
    fairleads.insert("FL2".to_string(), [-95.0, -18.0, 22.0]);

    Deck {
        general: GeneralSpec {
            frame: FrameConfig {
                global_handedness: Handedness::Rhs,
                gx_bearing_deg: 30.0,
            },
            location_tag: "West Field".to_string(),
            water_depth: 85.0,
            dividing_period: 40.0,
        },
        vessel: VesselSpec {
            tag: "FPSO Alpha".to_string(),
            type_name: "FPSO Type".to_string(),
            name: "FPSO".to_string(),
            length: 200.0,
            breadth: 40.0,
            depth: 25.0,
            draft: 12.0,
            mass: 120_000.0,
            gyradius: GyradiusSet {
                kxx: 14.0,
                kyy: 50.0,
                kzz: 52.0,
                kxy: 0.0,
                kyz: 0.0,
                kxz: 0.0,
            },
            centre_of_mass: [100.0, 0.0, 15.0],
            position: [0.0, 0.0, 0.0],
            heel_deg: 0.0,
            trim_deg: 0.0,
            heading_deg: 90.0,
            xref: LongitudinalRef::ForePerpendicular,
            xdir: LongitudinalDir::Aft,
            zref: VerticalRef::Baseline,
        },
        areas: AreaSheet {
            current: load_area([100.0, 0.0, -6.0]),
            wind: load_area([100.0, 0.0, 18.0]),
        },
        current_coeffs: coefficient_rows(),
        wind_coeffs: coefficient_rows(),
        fairleads,
        line_types: vec![
            LineTypeSpec {
                name: "LT_CHAIN".to_string(),
                wizard: true,
                family: "Chain".to_string(),
                construction: "Studless".to_string(),
                nominal_diameter: 0.12,
            },
            LineTypeSpec {
                name: "LT_WIRE".to_string(),
                wizard: false,
                family: "Wire rope".to_string(),
                construction: "6x36".to_string(),
                nominal_diameter: 0.0,
            },
        ],
        clump_types: vec![ClumpTypeSpec {
            name: "CB1".to_string(),
            mass: 5.0,
            volume: 2.0,
            height: 1.5,
            offset: 0.0,
        }],
        lines: vec![
            MooringLineSpec {
                name: "ML1".to_string(),
                fairlead_id: "FL1".to_string(),
                end_b: EndTermination::Anchored,
                horizontal_distance: 900.0,
                azimuth_deg: 45.0,
                vertical_position: 0.0,
                pretension: Some(1500.0),
                sections: vec![
                    SectionSpec {
                        line_type: "LT_CHAIN".to_string(),
                        length: 150.0,
                        target_segment_length: 5.0,
                    },
                    SectionSpec {
                        line_type: "LT_WIRE".to_string(),
                        length: 600.0,
                        target_segment_length: 10.0,
                    },
                ],
                attachments: vec![AttachmentSpec {
                    clump_type: "CB1".to_string(),
                    offset_from_end_b: 120.0,
                }],
            },
            MooringLineSpec {
                name: "ML2".to_string(),
                fairlead_id: "FL2".to_string(),
                end_b: EndTermination::Fixed,
                horizontal_distance: 800.0,
                azimuth_deg: 225.0,
                vertical_position: -30.0,
                pretension: None,
                sections: vec![SectionSpec {
                    line_type: "LT_WIRE".to_string(),
                    length: 700.0,
                    target_segment_length: 10.0,
                }],
                attachments: Vec::new(),
            },
        ],
        intact_cases: vec![
            case("IC 01", DirectionReference::North, RotationSense::Anticlockwise, "JONSWAP"),
            case("IC 02", DirectionReference::GlobalX, RotationSense::Clockwise, "Airy"),
        ],
        damage_cases: vec![
            DamageCaseSpec {
                case: case("DC1", DirectionReference::North, RotationSense::Anticlockwise, "JONSWAP"),
                removed_line: "ML2".to_string(),
            },
            DamageCaseSpec {
                case: case("DC2", DirectionReference::GlobalX, RotationSense::Clockwise, "Airy"),
                removed_line: "ML1".to_string(),
            },
        ],
    }
}

#[test]
fn build_persists_both_artifacts_and_configures_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let deck = sample_deck();
    let mut engine = MockEngine::new();

    let artifacts = build_model(&deck, &mut engine, dir.path()).unwrap();
    assert_eq!(
        artifacts.base_model,
        dir.path().join("INTACT").join("FPSOAlpha_WestField_INIT_SETUP.yml")
    );
    assert_eq!(
        artifacts.static_state,
        dir.path().join("INTACT").join("FPSOAlpha_WestField_INTACT_STATICS.sim")
    );
    assert!(artifacts.base_model.exists());
    assert!(artifacts.static_state.exists());

    assert_eq!(num(&engine, GENERAL, "StageCount"), 2.0);
    assert_eq!(num(&engine, ENVIRONMENT, "WaterDepth"), 85.0);
    assert_eq!(text(&engine, ENVIRONMENT, "WaveType"), "Airy");
    assert_eq!(num(&engine, "FPSO", "InitialHeading"), 90.0);
    assert_eq!(text(&engine, "FPSO", "IncludedInStatics"), "6 DOF");

    // mass * k^2 on the diagonal, cross terms as quoted
    assert_eq!(
        engine.indexed("FPSO Type", "MomentOfInertiaTensorX", 0),
        Some(&PropertyValue::Number(120_000.0 * 14.0 * 14.0))
    );

    // only the flagged line type goes through the wizard
    assert_eq!(engine.wizard_invocations(), ["LT_CHAIN"]);
    // a pretension target was present, so line setup ran once
    assert_eq!(engine.line_setup_runs(), 1);

    assert_eq!(num(&engine, "ML1", "NumberOfSections"), 2.0);
    assert_eq!(num(&engine, "ML1", "EndBHeightAboveSeabed"), 85.0);
    assert_eq!(num(&engine, "ML2", "EndBZ"), -30.0);
    assert_eq!(
        engine.indexed("ML1", "AttachmentZRelativeTo", 0),
        Some(&PropertyValue::Text("End B".to_string()))
    );
}

#[test]
fn end_b_position_rotates_the_fairlead_offset_into_the_global_frame() {
    let dir = tempfile::tempdir().unwrap();
    let deck = sample_deck();
    let mut engine = MockEngine::new();
    build_model(&deck, &mut engine, dir.path()).unwrap();

    // fairlead (95, 18), offset 900 @ 45 deg, rotated by the 90 deg heading
    let reach = 900.0 * 45f64.to_radians().cos();
    let expected_x = -(18.0 + reach);
    let expected_y = 95.0 + reach;
    approx_eq(num(&engine, "ML1", "EndBX"), expected_x, 1e-9);
    approx_eq(num(&engine, "ML1", "EndBY"), expected_y, 1e-9);
}

#[test]
fn rebuilding_from_identical_input_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let deck = sample_deck();

    let mut first = MockEngine::new();
    let artifacts = build_model(&deck, &mut first, dir.path()).unwrap();
    let base_before = fs::read(&artifacts.base_model).unwrap();
    let statics_before = fs::read(&artifacts.static_state).unwrap();

    let mut second = MockEngine::new();
    let artifacts = build_model(&deck, &mut second, dir.path()).unwrap();
    assert_eq!(fs::read(&artifacts.base_model).unwrap(), base_before);
    assert_eq!(fs::read(&artifacts.static_state).unwrap(), statics_before);
}

#[test]
fn unknown_references_abort_the_build_with_the_identifier() {
    let dir = tempfile::tempdir().unwrap();

    let mut deck = sample_deck();
    deck.lines[0].fairlead_id = "FL9".to_string();
    let err = build_model(&deck, &mut MockEngine::new(), dir.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("FL9") && message.contains("ML1"), "{message}");

    let mut deck = sample_deck();
    deck.lines[1].sections[0].line_type = "LT_MISSING".to_string();
    let err = build_model(&deck, &mut MockEngine::new(), dir.path()).unwrap_err();
    assert!(err.to_string().contains("LT_MISSING"));

    let mut deck = sample_deck();
    deck.lines[0].attachments[0].clump_type = "CB9".to_string();
    let err = build_model(&deck, &mut MockEngine::new(), dir.path()).unwrap_err();
    assert!(err.to_string().contains("CB9"));
}

#[test]
fn generated_case_artifacts_carry_their_resolved_environment() {
    let dir = tempfile::tempdir().unwrap();
    let deck = sample_deck();
    build_model(&deck, &mut MockEngine::new(), dir.path()).unwrap();

    let ledger = generate_cases(&deck, &mut MockEngine::new(), dir.path()).unwrap();
    assert_eq!(ledger.outcomes.len(), 4);
    assert_eq!(ledger.failure_count(), 0);

    // spaces in the case id become underscores in the artifact name
    let ic1 = dir
        .path()
        .join("INTACT")
        .join("FPSOAlpha_WestField_INTACT_DYNAMICS_IC_01.sim");
    assert!(ic1.exists());

    // IC 01: NORTH + 30 deg bearing lag, anticlockwise 45 -> 75
    let mut viewer = MockEngine::new();
    viewer.load_simulation(&ic1).unwrap();
    approx_eq(num(&viewer, ENVIRONMENT, "WaveDirection"), 75.0, 1e-12);
    assert_eq!(num(&viewer, ENVIRONMENT, "WaveHs"), 4.5);
    assert_eq!(num(&viewer, ENVIRONMENT, "WaveGamma"), 2.0);
    assert_eq!(num(&viewer, "FPSO", "PrimaryMotionDividingPeriod"), 40.0);

    // IC 02: deterministic wave, clockwise 30 about global X -> 330
    let ic2 = dir
        .path()
        .join("INTACT")
        .join("FPSOAlpha_WestField_INTACT_DYNAMICS_IC_02.sim");
    viewer.load_simulation(&ic2).unwrap();
    approx_eq(num(&viewer, ENVIRONMENT, "WaveDirection"), 330.0, 1e-12);
    assert_eq!(num(&viewer, ENVIRONMENT, "WaveHeight"), 3.0);

    // DC1 removed ML2 and nothing else
    let dc1 = dir
        .path()
        .join("DAMAGE")
        .join("FPSOAlpha_WestField_DAMAGE_DYNAMICS_DC1.sim");
    viewer.load_simulation(&dc1).unwrap();
    assert!(viewer.has_object("ML1"));
    assert!(!viewer.has_object("ML2"));
    approx_eq(num(&viewer, ENVIRONMENT, "WaveGamma"), 2.0, 1e-12);
}

#[test]
fn damage_cases_are_isolated_and_order_independent() {
    let dir = tempfile::tempdir().unwrap();
    let deck = sample_deck();
    build_model(&deck, &mut MockEngine::new(), dir.path()).unwrap();

    let damage_path = |id: &str| {
        dir.path()
            .join("DAMAGE")
            .join(format!("FPSOAlpha_WestField_DAMAGE_DYNAMICS_{id}.sim"))
    };

    generate_cases(&deck, &mut MockEngine::new(), dir.path()).unwrap();
    let dc1_forward = fs::read(damage_path("DC1")).unwrap();
    let dc2_forward = fs::read(damage_path("DC2")).unwrap();

    let mut reversed = deck.clone();
    reversed.damage_cases.reverse();
    generate_cases(&reversed, &mut MockEngine::new(), dir.path()).unwrap();
    assert_eq!(fs::read(damage_path("DC1")).unwrap(), dc1_forward);
    assert_eq!(fs::read(damage_path("DC2")).unwrap(), dc2_forward);

    let mut only_dc1 = deck.clone();
    only_dc1.damage_cases.truncate(1);
    generate_cases(&only_dc1, &mut MockEngine::new(), dir.path()).unwrap();
    assert_eq!(fs::read(damage_path("DC1")).unwrap(), dc1_forward);
}

#[test]
fn a_missing_damage_line_fails_only_its_own_case() {
    let dir = tempfile::tempdir().unwrap();
    let mut deck = sample_deck();
    deck.damage_cases[1].removed_line = "ML9".to_string();
    build_model(&deck, &mut MockEngine::new(), dir.path()).unwrap();

    let ledger = generate_cases(&deck, &mut MockEngine::new(), dir.path()).unwrap();
    assert_eq!(ledger.failure_count(), 1);

    let failed = ledger
        .outcomes
        .iter()
        .find(|outcome| !outcome.succeeded())
        .unwrap();
    assert_eq!(failed.case_id, "DC2");
    assert!(failed.error.as_deref().unwrap().contains("ML9"));

    // the other damage case and all intact cases still produced artifacts
    assert!(dir
        .path()
        .join("DAMAGE")
        .join("FPSOAlpha_WestField_DAMAGE_DYNAMICS_DC1.sim")
        .exists());
    assert_eq!(
        ledger.outcomes.iter().filter(|o| o.succeeded()).count(),
        3
    );

    // the persisted ledger matches what was returned
    let raw = fs::read_to_string(paths::ledger_path(dir.path())).unwrap();
    let persisted: CaseLedger = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.failure_count(), 1);
    assert_eq!(persisted.outcomes.len(), ledger.outcomes.len());
}

#[test]
fn static_results_extracts_forces_and_offsets() {
    let dir = tempfile::tempdir().unwrap();
    let deck = sample_deck();
    build_model(&deck, &mut MockEngine::new(), dir.path()).unwrap();

    let mut engine = MockEngine::new();
    engine.set_static_result("ML1", "Effective Tension", Some(LineEnd::EndA), 1234.5);
    engine.set_static_result("FPSO", "Rotation 3", None, -2.25);

    let report = static_results(&deck, &mut engine, dir.path()).unwrap();
    assert_eq!(report.line_forces.len(), 2);
    assert_eq!(report.line_forces[0].0, "ML1");
    assert_eq!(report.line_forces[0].1[0], 1234.5);
    assert_eq!(report.vessel_offsets[5], -2.25);

    let forces = fs::read_to_string(
        dir.path().join("OUTPUT").join("intact_static_line_forces.csv"),
    )
    .unwrap();
    let header = forces.lines().next().unwrap();
    assert_eq!(header.split(',').count(), 9);
    assert!(forces.contains("1234.5"));

    let offsets =
        fs::read_to_string(dir.path().join("OUTPUT").join("intact_static_offsets.csv")).unwrap();
    assert!(offsets.lines().next().unwrap().contains("FPSO"));
    assert_eq!(offsets.lines().count(), 7);
}

#[test]
fn dynamic_summary_has_case_by_line_shape_with_finite_cells() {
    let dir = tempfile::tempdir().unwrap();
    let deck = sample_deck();
    build_model(&deck, &mut MockEngine::new(), dir.path()).unwrap();
    generate_cases(&deck, &mut MockEngine::new(), dir.path()).unwrap();

    let summary = dynamic_results(&deck, &mut MockEngine::new(), dir.path()).unwrap();
    assert_eq!(summary.line_tables.len(), 5 * 8);
    assert_eq!(summary.vessel_tables.len(), 5);

    for table in summary.line_tables.iter().chain(summary.vessel_tables.iter()) {
        assert_eq!(table.rows.len(), deck.intact_cases.len(), "{}", table.channel);
        for (case_id, values) in &table.rows {
            assert_eq!(values.len(), table.columns.len(), "{case_id}/{}", table.channel);
            assert!(values.iter().all(|v| v.is_finite()));
        }
    }

    // the Rayleigh upper-tail fit sits above the lower-tail fit, cell for cell
    let mpv_max = &summary.line_tables[0];
    let mpv_min = &summary.line_tables[8];
    assert_eq!(mpv_max.channel, mpv_min.channel);
    for (row_max, row_min) in mpv_max.rows.iter().zip(mpv_min.rows.iter()) {
        for (a, b) in row_max.1.iter().zip(row_min.1.iter()) {
            assert!(a > b);
        }
    }

    let output = dir.path().join("OUTPUT");
    assert!(output.join("MPV_MAX_END_A_EFF_TEN.csv").exists());
    assert!(output.join("RMS_VESSEL_EXCURSIONS.csv").exists());
    let table = fs::read_to_string(output.join("MAX_END_B_GZ_FORCE.csv")).unwrap();
    assert_eq!(table.lines().count(), 1 + deck.intact_cases.len());
}
