pub mod action;
pub mod bridge;
pub mod camera;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod motion;
pub mod teleop;

pub use action::ActionGroup;
pub use client::PuppyClient;
pub use error::{Error, Result};
pub use motion::Gait;
