// Body pose payloads
// Converts user units (degrees, millimetres, seconds) into the pose topic's units.

use crate::messages::PoseParameters;

/// Leg height of the standing preset, in pose-topic units
pub const STAND_HEIGHT: f64 = -10.0;
pub const STAND_X_SHIFT: f64 = -0.5;

/// Leg height of the lying-down preset, in pose-topic units
pub const LIE_DOWN_HEIGHT: f64 = -5.0;
pub const LIE_DOWN_X_SHIFT: f64 = 2.0;

/// Seconds to whole milliseconds, never negative
pub fn run_time_millis(run_time_secs: f64) -> u32 {
    let ms = (run_time_secs * 1000.0).round();
    if ms.is_nan() || ms <= 0.0 {
        0
    } else if ms >= u32::MAX as f64 {
        u32::MAX
    } else {
        ms as u32
    }
}

/// Height in millimetres to the pose topic's convention (negated centimetres)
pub fn height_from_mm(height_mm: f64) -> f64 {
    -height_mm / 10.0
}

/// Build an explicit pose
///
/// # Arguments
/// * `roll_deg` - Body roll in degrees
/// * `pitch_deg` - Body pitch in degrees
/// * `height_mm` - Leg height in millimetres
/// * `run_time_secs` - Time to reach the pose
pub fn compute_pose_parameters(
    roll_deg: f64,
    pitch_deg: f64,
    height_mm: f64,
    run_time_secs: f64,
) -> PoseParameters {
    PoseParameters {
        roll: roll_deg.to_radians(),
        pitch: pitch_deg.to_radians(),
        yaw: 0.0,
        height: height_from_mm(height_mm),
        x_shift: 0.0,
        stance_x: 0.0,
        stance_y: 0.0,
        run_time: run_time_millis(run_time_secs),
    }
}

/// Standing preset
pub fn compute_stand_pose(run_time_secs: f64) -> PoseParameters {
    preset(STAND_HEIGHT, STAND_X_SHIFT, run_time_secs)
}

/// Lying-down preset
pub fn compute_lie_down_pose(run_time_secs: f64) -> PoseParameters {
    preset(LIE_DOWN_HEIGHT, LIE_DOWN_X_SHIFT, run_time_secs)
}

fn preset(height: f64, x_shift: f64, run_time_secs: f64) -> PoseParameters {
    PoseParameters {
        height,
        x_shift,
        run_time: run_time_millis(run_time_secs),
        ..PoseParameters::default()
    }
}
