// Error types for the motion layer, the bridge transports and the client

/// Rejected motion input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MotionError {
    #[error("Unknown gait '{0}' (expected Trot, Amble or Walk)")]
    UnknownGait(String),

    #[error("Unknown action group '{0}'")]
    UnknownAction(String),

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// Failures talking to the middleware bridge
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Zenoh error: {0}")]
    Zenoh(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timed out connecting to {0}")]
    ConnectTimeout(String),

    #[error("Bridge connection closed")]
    Closed,

    #[error("Service {service} failed: {reason}")]
    ServiceFailed { service: String, reason: String },

    #[error("Timed out waiting for service {0}")]
    ServiceTimeout(String),

    #[error("Topic {0} has no known type on the bridge")]
    UnknownTopic(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

// zenoh reports errors as boxed trait objects
impl From<Box<dyn std::error::Error + Send + Sync>> for BridgeError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        BridgeError::Zenoh(err.to_string())
    }
}

/// Crate-level error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Bridge(BridgeError::Json(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
