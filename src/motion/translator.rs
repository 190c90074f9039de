// Session translator
// Holds the last pose sent to the robot. A move re-publishes that pose with the
// gait's x_shift, so a move after a custom pose keeps its roll/pitch/height.

use tracing::debug;

use super::gait::Gait;
use super::pose::compute_stand_pose;
use super::velocity::compute_velocity_command;
use crate::config::DEFAULT_POSE_RUN_TIME;
use crate::messages::{GaitConfig, PoseParameters, VelocityCommand};

/// Payloads for one move, in publish order
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    pub pose: PoseParameters,
    pub gait: GaitConfig,
    pub velocity: VelocityCommand,
}

pub struct MotionTranslator {
    pose: PoseParameters,
}

impl MotionTranslator {
    /// Start from the standing pose
    pub fn new() -> Self {
        Self {
            pose: compute_stand_pose(DEFAULT_POSE_RUN_TIME.as_secs_f64()),
        }
    }

    /// Last pose sent (or planned) for the robot
    pub fn current_pose(&self) -> &PoseParameters {
        &self.pose
    }

    /// Replace the session pose
    pub fn apply_pose(&mut self, pose: PoseParameters) -> PoseParameters {
        debug!("Session pose: {:?}", pose);
        self.pose = pose;
        pose
    }

    /// Plan a move: overwrite x_shift for the gait and keep it in the session
    pub fn plan_move(&mut self, x: f64, yaw_rate_deg: f64, gait: Gait) -> MovePlan {
        self.pose.x_shift = gait.x_shift();
        MovePlan {
            pose: self.pose,
            gait: gait.config(),
            velocity: compute_velocity_command(x, yaw_rate_deg),
        }
    }
}

impl Default for MotionTranslator {
    fn default() -> Self {
        Self::new()
    }
}
