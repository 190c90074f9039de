// Canned action groups stored on the robot
// The robot plays them server-side and gives no progress signal.

use std::fmt;
use std::str::FromStr;

use crate::config::ACTION_GROUP_SUFFIX;
use crate::error::MotionError;
use crate::messages::ActionGroupRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionGroup {
    Boxing,
    Boxing2,
    Bow,
    Jump,
    KickBallLeft,
    KickBallRight,
    LieDown,
    Moonwalk,
    Nod,
    Pee,
    PushUp,
    ShakeHands,
    ShakeHead,
    Sit,
    Spacewalk,
    Stretch,
    StandTwoLegs,
    StandFourLegs,
    UpStairs2cm,
    UpStairs3_5cm,
    UpStairs3_5cm0,
    UpStairs3_5cm1,
    Wave,
}

impl ActionGroup {
    pub const ALL: [ActionGroup; 23] = [
        ActionGroup::Boxing,
        ActionGroup::Boxing2,
        ActionGroup::Bow,
        ActionGroup::Jump,
        ActionGroup::KickBallLeft,
        ActionGroup::KickBallRight,
        ActionGroup::LieDown,
        ActionGroup::Moonwalk,
        ActionGroup::Nod,
        ActionGroup::Pee,
        ActionGroup::PushUp,
        ActionGroup::ShakeHands,
        ActionGroup::ShakeHead,
        ActionGroup::Sit,
        ActionGroup::Spacewalk,
        ActionGroup::Stretch,
        ActionGroup::StandTwoLegs,
        ActionGroup::StandFourLegs,
        ActionGroup::UpStairs2cm,
        ActionGroup::UpStairs3_5cm,
        ActionGroup::UpStairs3_5cm0,
        ActionGroup::UpStairs3_5cm1,
        ActionGroup::Wave,
    ];

    /// File name of the action group on the robot, without extension
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionGroup::Boxing => "boxing",
            ActionGroup::Boxing2 => "boxing2",
            ActionGroup::Bow => "bow",
            ActionGroup::Jump => "jump",
            ActionGroup::KickBallLeft => "kick_ball_left",
            ActionGroup::KickBallRight => "kick_ball_right",
            ActionGroup::LieDown => "lie_down",
            ActionGroup::Moonwalk => "moonwalk",
            ActionGroup::Nod => "nod",
            ActionGroup::Pee => "pee",
            ActionGroup::PushUp => "push-up",
            ActionGroup::ShakeHands => "shake_hands",
            ActionGroup::ShakeHead => "shake_head",
            ActionGroup::Sit => "sit",
            ActionGroup::Spacewalk => "spacewalk",
            ActionGroup::Stretch => "stretch",
            ActionGroup::StandTwoLegs => "2_legs_stand",
            ActionGroup::StandFourLegs => "stand",
            ActionGroup::UpStairs2cm => "up_stairs_2cm",
            ActionGroup::UpStairs3_5cm => "up_stairs_3.5cm",
            ActionGroup::UpStairs3_5cm0 => "up_stairs_3.5cm0",
            ActionGroup::UpStairs3_5cm1 => "up_stairs_3.5cm1",
            ActionGroup::Wave => "wave",
        }
    }
}

impl fmt::Display for ActionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionGroup {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionGroup::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| MotionError::UnknownAction(s.to_string()))
    }
}

impl ActionGroupRequest {
    pub fn for_action(action: ActionGroup) -> Self {
        Self::named(action.as_str())
    }

    /// Request an action group file that is not in the catalogue
    pub fn named(name: &str) -> Self {
        Self {
            name: format!("{}{}", name, ACTION_GROUP_SUFFIX),
        }
    }
}
