// Bridge endpoint, topics, pacing and teleop timing
use std::time::Duration;

// Default rosbridge endpoint (robot access point address)
pub const DEFAULT_HOST: &str = "192.168.149.1";
pub const DEFAULT_PORT: u16 = 9090;

// Default zenoh router port when the zenoh transport is selected
pub const DEFAULT_ZENOH_PORT: u16 = 7447;

// Robot topics and services
pub const TOPIC_VELOCITY: &str = "/puppy_control/velocity"; // velocity commands
pub const TOPIC_POSE: &str = "/puppy_control/pose"; // body pose
pub const TOPIC_GAIT: &str = "/puppy_control/gait"; // gait timing
pub const TOPIC_IMAGE_RAW: &str = "/usb_cam/image_raw"; // camera frames
pub const SERVICE_RUN_ACTION_GROUP: &str = "/puppy_control/runActionGroup";

// rosapi introspection services
pub const SERVICE_TOPIC_TYPE: &str = "/rosapi/topic_type";
pub const SERVICE_MESSAGE_DETAILS: &str = "/rosapi/message_details";

// Action group files on the robot carry this extension
pub const ACTION_GROUP_SUFFIX: &str = ".d6ac";

// Publisher / subscriber queue depth
pub const QUEUE_SIZE: u32 = 1;

// Pacing: motions are open-loop, so the client waits instead of awaiting an ack
pub const DEFAULT_POSE_RUN_TIME: Duration = Duration::from_secs(1);
pub const POSE_SETTLE_MARGIN: Duration = Duration::from_millis(200);
pub const DEFAULT_ACTION_PAUSE: Duration = Duration::from_secs(4);

// Bridge timeouts
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const SERVICE_TIMEOUT: Duration = Duration::from_secs(5);

// Keyboard teleop
pub const TELEOP_POLL: Duration = Duration::from_millis(20);
pub const TELEOP_INPUT_TIMEOUT: Duration = Duration::from_millis(300);
pub const TELEOP_SPEEDS: [f64; 3] = [5.0, 15.0, 30.0]; // forward speed steps
pub const TELEOP_YAW_RATES: [f64; 3] = [10.0, 25.0, 45.0]; // deg/s
