// Command-line interface

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_ZENOH_PORT};
use crate::motion::Gait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// rosbridge WebSocket (ws://host:port)
    Rosbridge,
    /// zenoh router
    Zenoh,
}

/// Remote control for a PuppyPi quadruped
#[derive(Debug, Parser)]
#[command(name = "puppy", version)]
pub struct Cli {
    /// Robot address
    #[arg(long, global = true, default_value = DEFAULT_HOST)]
    pub host: String,

    /// rosbridge port
    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Bridge to talk through
    #[arg(long, global = true, value_enum, default_value_t = TransportKind::Rosbridge)]
    pub transport: TransportKind,

    /// Zenoh router endpoint (defaults to tcp/<host>:7447)
    #[arg(long, global = true)]
    pub zenoh_endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a canned action group (see `actions`)
    Action {
        name: String,
        /// Seconds to wait for the action to finish
        #[arg(long, default_value = "4", value_parser = parse_secs)]
        pause: Duration,
    },
    /// List the action groups the robot ships with
    Actions,
    /// Set body pose
    Pose {
        /// Roll in degrees (-30..30)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        roll: f64,
        /// Pitch in degrees (-30..30)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        pitch: f64,
        /// Leg height in mm (50..150)
        #[arg(long)]
        height: f64,
        /// Seconds to reach the pose
        #[arg(long, default_value = "1", value_parser = parse_secs)]
        run_time: Duration,
    },
    /// Standing pose
    Stand {
        #[arg(long, default_value = "1", value_parser = parse_secs)]
        run_time: Duration,
    },
    /// Lying-down pose
    LieDown {
        #[arg(long, default_value = "1", value_parser = parse_secs)]
        run_time: Duration,
    },
    /// Walk for a while, then stop
    Move {
        /// Forward speed (-35..35)
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        /// Turn rate in deg/s (-50..50)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        yaw_rate: f64,
        /// Trot, Amble or Walk
        #[arg(long, default_value = "Walk")]
        gait: Gait,
        /// Seconds to walk before stopping
        #[arg(long, default_value = "2", value_parser = parse_secs)]
        duration: Duration,
    },
    /// Stop walking
    Stop,
    /// Print metadata of camera frames
    Camera {
        #[arg(long, default_value_t = 10)]
        frames: usize,
    },
    /// Show the type and fields of a topic
    Inspect {
        #[arg(default_value = crate::config::TOPIC_VELOCITY)]
        topic: String,
    },
    /// Drive from the keyboard
    Teleop,
}

fn parse_secs(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{}", e))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{} seconds: {}", s, e))
}

impl Cli {
    pub fn rosbridge_url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }

    pub fn zenoh_endpoint(&self) -> String {
        self.zenoh_endpoint
            .clone()
            .unwrap_or_else(|| format!("tcp/{}:{}", self.host, DEFAULT_ZENOH_PORT))
    }
}
