//! Physical input limits for pose and velocity requests

use crate::error::MotionError;

/// Input limits checked at the client boundary.
///
/// The robot does not reject out-of-range values itself, so anything that
/// passes here is forwarded as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionLimits {
    /// Body roll range (degrees)
    pub roll_deg: (f64, f64),

    /// Body pitch range (degrees)
    pub pitch_deg: (f64, f64),

    /// Leg height range (millimetres)
    pub height_mm: (f64, f64),

    /// Forward speed range
    pub x: (f64, f64),

    /// Turn rate range (deg/s)
    pub yaw_rate_deg: (f64, f64),

    /// Upper bound on pose run time (seconds)
    pub max_run_time_secs: f64,
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            roll_deg: (-30.0, 30.0),
            pitch_deg: (-30.0, 30.0),
            height_mm: (50.0, 150.0),
            x: (-35.0, 35.0),
            yaw_rate_deg: (-50.0, 50.0),
            max_run_time_secs: 60.0,
        }
    }
}

impl MotionLimits {
    /// Check an explicit pose request
    pub fn check_pose(
        &self,
        roll_deg: f64,
        pitch_deg: f64,
        height_mm: f64,
        run_time_secs: f64,
    ) -> Result<(), MotionError> {
        check("roll", roll_deg, self.roll_deg)?;
        check("pitch", pitch_deg, self.pitch_deg)?;
        check("height", height_mm, self.height_mm)?;
        self.check_run_time(run_time_secs)
    }

    /// Check a run time on its own (preset poses)
    pub fn check_run_time(&self, run_time_secs: f64) -> Result<(), MotionError> {
        check("run_time", run_time_secs, (0.0, self.max_run_time_secs))
    }

    /// Check a velocity request
    pub fn check_velocity(&self, x: f64, yaw_rate_deg: f64) -> Result<(), MotionError> {
        check("x", x, self.x)?;
        check("yaw_rate", yaw_rate_deg, self.yaw_rate_deg)
    }
}

fn check(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), MotionError> {
    if !value.is_finite() {
        return Err(MotionError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(MotionError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
