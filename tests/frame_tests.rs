use spreadmoor::frame::{
    resolve_case_direction, resolve_end_b_position, resolve_vertex_extents, DirectionReference,
    FrameConfig, Handedness, LongitudinalDir, LongitudinalRef, RotationSense, VerticalRef,
};
use spreadmoor::paths::filename_valid;

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

const FRAME: FrameConfig = FrameConfig {
    global_handedness: Handedness::Rhs,
    gx_bearing_deg: 30.0,
};

#[test]
fn fp_referenced_aft_growing_hull_puts_the_stern_at_plus_length() {
    let ext = resolve_vertex_extents(
        200.0,
        40.0,
        25.0,
        12.0,
        LongitudinalRef::ForePerpendicular,
        LongitudinalDir::Aft,
        VerticalRef::Baseline,
    );
    assert_eq!(ext.x_aft, 200.0);
    assert_eq!(ext.x_fwd, 0.0);
}

#[test]
fn every_reference_combination_spans_length_and_depth() {
    for xref in [
        LongitudinalRef::ForePerpendicular,
        LongitudinalRef::AftPerpendicular,
        LongitudinalRef::Midships,
    ] {
        for (xdir, sign) in [(LongitudinalDir::Forward, 1.0), (LongitudinalDir::Aft, -1.0)] {
            for zref in [VerticalRef::Baseline, VerticalRef::Draft] {
                let ext = resolve_vertex_extents(180.0, 32.0, 20.0, 9.0, xref, xdir, zref);
                approx_eq(ext.x_fwd - ext.x_aft, sign * 180.0, 1e-12);
                approx_eq(ext.z_main_deck - ext.z_baseline, 20.0, 1e-12);
            }
        }
    }
}

#[test]
fn north_referenced_anticlockwise_direction_gains_the_bearing_lag() {
    let dir = resolve_case_direction(
        DirectionReference::North,
        RotationSense::Anticlockwise,
        45.0,
        &FRAME,
        0.0,
    );
    approx_eq(dir, 75.0, 1e-12);
}

#[test]
fn clockwise_nominal_is_mirrored_before_the_lag_is_added() {
    let dir = resolve_case_direction(
        DirectionReference::North,
        RotationSense::Clockwise,
        45.0,
        &FRAME,
        0.0,
    );
    approx_eq(dir, 345.0, 1e-12);
}

#[test]
fn vessel_referenced_directions_track_the_heading() {
    let fwd = resolve_case_direction(
        DirectionReference::VesselForward,
        RotationSense::Anticlockwise,
        0.0,
        &FRAME,
        200.0,
    );
    let aft = resolve_case_direction(
        DirectionReference::VesselAft,
        RotationSense::Anticlockwise,
        0.0,
        &FRAME,
        200.0,
    );
    approx_eq(fwd, 200.0, 1e-12);
    approx_eq(aft, 20.0, 1e-12);
}

#[test]
fn resolved_directions_always_land_in_the_half_open_circle() {
    for reference in [
        DirectionReference::GlobalX,
        DirectionReference::East,
        DirectionReference::South,
        DirectionReference::West,
    ] {
        for nominal in [0.0, 90.0, 350.0, 360.0, 725.0] {
            let dir = resolve_case_direction(
                reference,
                RotationSense::Clockwise,
                nominal,
                &FRAME,
                45.0,
            );
            assert!((0.0..360.0).contains(&dir), "{reference:?}/{nominal}: {dir}");
        }
    }
}

#[test]
fn quarter_turn_heading_rotates_the_end_b_offset_onto_the_y_axis() {
    let pos = resolve_end_b_position([0.0, 0.0, 0.0], 100.0, 0.0, 90.0, [0.0, 0.0, 0.0]);
    approx_eq(pos[0], 0.0, 1e-9);
    approx_eq(pos[1], 100.0, 1e-9);
}

#[test]
fn filename_sanitization_strips_the_invalid_set_and_keeps_order() {
    assert_eq!(filename_valid("A<B>C:D\"E/F\\G|H?I*J K"), "ABCDEFGHIJK");
    assert_eq!(filename_valid("Moor-Line_2.1"), "Moor-Line_2.1");
}
