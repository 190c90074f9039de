// Velocity command payloads

use crate::messages::VelocityCommand;

/// Build a velocity command
///
/// # Arguments
/// * `x` - Forward speed (positive = forward)
/// * `yaw_rate_deg` - Turn rate in deg/s; the robot's convention is the opposite sign
pub fn compute_velocity_command(x: f64, yaw_rate_deg: f64) -> VelocityCommand {
    VelocityCommand {
        x,
        y: 0.0,
        yaw_rate: (-yaw_rate_deg).to_radians(),
    }
}
