//! Middleware bridge transports.
//!
//! The client never speaks to the robot's middleware directly. It hands JSON
//! payloads to a [`Transport`], which maps topics and services onto a
//! concrete bridge:
//!
//! - [`RosbridgeTransport`] – rosbridge v2 protocol over a WebSocket.
//! - [`ZenohTransport`] – topics and services as zenoh key expressions.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::BridgeError;

#[cfg(test)]
pub(crate) mod mock;
mod rosbridge;
mod zenoh_bridge;

pub use rosbridge::RosbridgeTransport;
pub use zenoh_bridge::ZenohTransport;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Publish/subscribe and service access on the robot's middleware bus.
///
/// # Contract
///
/// * `publish` on a topic requires an earlier `advertise` for it.
/// * `subscribe` returns a channel fed with every message received on the
///   topic until `unsubscribe` is called or the bridge closes.
/// * `call_service` resolves with the service's response values.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Message type name of a topic
    async fn topic_type(&self, topic: &str) -> Result<String>;

    /// Field layout of a message type
    async fn message_details(&self, msg_type: &str) -> Result<Value>;

    async fn advertise(&self, topic: &str, msg_type: &str, queue_size: u32) -> Result<()>;

    async fn unadvertise(&self, topic: &str) -> Result<()>;

    async fn publish(&self, topic: &str, msg: Value) -> Result<()>;

    async fn subscribe(
        &self,
        topic: &str,
        msg_type: &str,
        queue_length: u32,
    ) -> Result<mpsc::Receiver<Value>>;

    async fn unsubscribe(&self, topic: &str) -> Result<()>;

    async fn call_service(&self, service: &str, args: Value) -> Result<Value>;

    /// Tear down the bridge connection
    async fn close(&self) -> Result<()>;
}
