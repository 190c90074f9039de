// Gait presets for the quadruped
// Each gait pairs a timing/clearance set with the body x_shift that keeps it balanced.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::MotionError;
use crate::messages::GaitConfig;

/// Locomotion style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gait {
    Trot,
    Amble,
    #[default]
    Walk,
}

impl Gait {
    pub const ALL: [Gait; 3] = [Gait::Trot, Gait::Amble, Gait::Walk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gait::Trot => "Trot",
            Gait::Amble => "Amble",
            Gait::Walk => "Walk",
        }
    }

    /// Timing and clearance published on the gait topic
    pub fn config(&self) -> GaitConfig {
        match self {
            Gait::Trot => GaitConfig {
                overlap_time: 0.2,
                swing_time: 0.3,
                clearance_time: 0.0,
                z_clearance: 5.0,
            },
            Gait::Amble => GaitConfig {
                overlap_time: 0.1,
                swing_time: 0.2,
                clearance_time: 0.1,
                z_clearance: 5.0,
            },
            Gait::Walk => GaitConfig {
                overlap_time: 0.1,
                swing_time: 0.2,
                clearance_time: 0.3,
                z_clearance: 5.0,
            },
        }
    }

    /// Body x_shift applied to the pose while walking with this gait
    pub fn x_shift(&self) -> f64 {
        match self {
            Gait::Trot => -0.6,
            Gait::Amble => -0.9,
            Gait::Walk => -0.65,
        }
    }
}

impl fmt::Display for Gait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gait {
    type Err = MotionError;

    /// Exact, case-sensitive match. Unknown names are an error here;
    /// [`compute_gait_parameters`] is the lenient lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Trot" => Ok(Gait::Trot),
            "Amble" => Ok(Gait::Amble),
            "Walk" => Ok(Gait::Walk),
            other => Err(MotionError::UnknownGait(other.to_string())),
        }
    }
}

/// Look up a gait preset by name, falling back to Walk for unknown names
pub fn compute_gait_parameters(gait_name: &str) -> (GaitConfig, f64) {
    let gait = gait_name.parse::<Gait>().unwrap_or_else(|e| {
        warn!("{}, using Walk", e);
        Gait::Walk
    });
    (gait.config(), gait.x_shift())
}
