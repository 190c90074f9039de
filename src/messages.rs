// Payload types published to / received from the robot

use serde::{Deserialize, Serialize};

/// Body pose published on the pose topic.
///
/// Angles are radians, `run_time` is integer milliseconds. `height` is the
/// negated leg height in centimetres, which is the robot's own convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PoseParameters {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub height: f64,
    pub x_shift: f64,
    pub stance_x: f64,
    pub stance_y: f64,
    pub run_time: u32,
}

/// Gait timing published on the gait topic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GaitConfig {
    pub overlap_time: f64,
    pub swing_time: f64,
    pub clearance_time: f64,
    pub z_clearance: f64,
}

/// Velocity command published on the velocity topic.
/// `yaw_rate` is rad/s in the robot's sign convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct VelocityCommand {
    pub x: f64,
    pub y: f64,
    pub yaw_rate: f64,
}

impl VelocityCommand {
    pub fn zero() -> Self {
        Self::default()
    }
}

// Request for the action group service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionGroupRequest {
    pub name: String,
}
