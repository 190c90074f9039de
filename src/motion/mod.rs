// Motion parameter translation for the quadruped
//
// Provides:
// - Gait presets (timing, clearance and the x_shift each gait needs)
// - Pose and velocity payload computation from user units
// - Input limits checked before anything reaches the robot
// - Pacing delays standing in for motion-completion feedback
// - A session translator carrying the last applied pose

pub mod gait;
pub mod limits;
pub mod pacing;
pub mod pose;
mod translator;
pub mod velocity;

pub use gait::{compute_gait_parameters, Gait};
pub use limits::MotionLimits;
pub use pacing::{action_pause, pose_settle_delay};
pub use pose::{compute_lie_down_pose, compute_pose_parameters, compute_stand_pose};
pub use translator::{MotionTranslator, MovePlan};
pub use velocity::compute_velocity_command;
