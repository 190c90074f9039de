// Pacing delays
// The robot never acknowledges that a motion finished, so the client waits a
// fixed time after each pose or action before issuing anything else.

use std::time::Duration;

use crate::config::{DEFAULT_ACTION_PAUSE, POSE_SETTLE_MARGIN};
use crate::messages::PoseParameters;

/// Wait after publishing `pose`: its run time plus the settle margin
pub fn pose_settle_delay(pose: &PoseParameters) -> Duration {
    Duration::from_millis(u64::from(pose.run_time)) + POSE_SETTLE_MARGIN
}

/// Wait after an action group; `None` uses the default pause
pub fn action_pause(pause: Option<Duration>) -> Duration {
    pause.unwrap_or(DEFAULT_ACTION_PAUSE)
}
