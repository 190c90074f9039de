// Zenoh transport
// ROS names map to key expressions without the leading slash
// (/puppy_control/pose -> puppy_control/pose). Payloads are JSON text.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use zenoh::pubsub::Publisher;

use super::{Result, Transport};
use crate::error::BridgeError;

/// Type reported for every topic: zenoh samples carry no ROS type
pub const ZENOH_JSON_TYPE: &str = "zenoh/json";

pub fn key_expr(name: &str) -> &str {
    name.trim_start_matches('/')
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn decode(bytes: &[u8]) -> Result<Value> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(bytes)?)
}

pub struct ZenohTransport {
    session: zenoh::Session,
    publishers: tokio::sync::Mutex<HashMap<String, Publisher<'static>>>,
    subscriptions: Mutex<HashMap<String, JoinHandle<()>>>,
    query_timeout: Duration,
}

impl ZenohTransport {
    /// Open a zenoh session, optionally pinned to a router endpoint
    /// such as `tcp/192.168.149.1:7447`
    pub async fn connect(endpoint: Option<&str>, query_timeout: Duration) -> Result<Self> {
        let mut config = zenoh::Config::default();
        if let Some(endpoint) = endpoint {
            config
                .insert_json5("connect/endpoints", &format!("[\"{}\"]", endpoint))
                .map_err(|e| BridgeError::Zenoh(e.to_string()))?;
        }
        Self::open(config, query_timeout).await
    }

    /// Open a session from a prepared config
    pub async fn open(config: zenoh::Config, query_timeout: Duration) -> Result<Self> {
        info!("Opening Zenoh session...");
        let session = zenoh::open(config).await?;
        info!("Zenoh session open (zid {})", session.zid());

        Ok(Self {
            session,
            publishers: tokio::sync::Mutex::new(HashMap::new()),
            subscriptions: Mutex::new(HashMap::new()),
            query_timeout,
        })
    }
}

#[async_trait]
impl Transport for ZenohTransport {
    async fn topic_type(&self, _topic: &str) -> Result<String> {
        Ok(ZENOH_JSON_TYPE.to_string())
    }

    async fn message_details(&self, msg_type: &str) -> Result<Value> {
        Err(BridgeError::Protocol(format!(
            "zenoh cannot describe message type {}",
            msg_type
        )))
    }

    async fn advertise(&self, topic: &str, _msg_type: &str, _queue_size: u32) -> Result<()> {
        let key = key_expr(topic).to_string();
        let publisher = self.session.declare_publisher(key.clone()).await?;
        debug!("Declared publisher on {}", key);
        self.publishers.lock().await.insert(topic.to_string(), publisher);
        Ok(())
    }

    async fn unadvertise(&self, topic: &str) -> Result<()> {
        let publisher = self.publishers.lock().await.remove(topic);
        if let Some(publisher) = publisher {
            publisher.undeclare().await?;
        }
        Ok(())
    }

    async fn publish(&self, topic: &str, msg: Value) -> Result<()> {
        let publishers = self.publishers.lock().await;
        let publisher = publishers.get(topic).ok_or_else(|| {
            BridgeError::Protocol(format!("publish on {} before advertise", topic))
        })?;
        publisher.put(msg.to_string()).await?;
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &str,
        _msg_type: &str,
        queue_length: u32,
    ) -> Result<mpsc::Receiver<Value>> {
        self.unsubscribe(topic).await?;

        let key = key_expr(topic).to_string();
        let subscriber = self.session.declare_subscriber(key.clone()).await?;
        let (tx, rx) = mpsc::channel(queue_length.max(1) as usize);

        let task = tokio::spawn(async move {
            while let Ok(sample) = subscriber.recv_async().await {
                let payload = sample.payload().to_bytes();
                match decode(&payload) {
                    Ok(msg) => match tx.try_send(msg) {
                        Ok(()) => {}
                        // Queue full: dropping newest while the consumer lags
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            debug!("Subscriber on {} lagging, dropping sample", key)
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => break,
                    },
                    Err(e) => warn!("Failed to parse sample on {}: {}", key, e),
                }
            }
        });
        lock(&self.subscriptions).insert(topic.to_string(), task);
        Ok(rx)
    }

    async fn unsubscribe(&self, topic: &str) -> Result<()> {
        if let Some(task) = lock(&self.subscriptions).remove(topic) {
            task.abort();
        }
        Ok(())
    }

    async fn call_service(&self, service: &str, args: Value) -> Result<Value> {
        let replies = self
            .session
            .get(key_expr(service).to_string())
            .payload(args.to_string())
            .timeout(self.query_timeout)
            .await?;

        let reply = replies
            .recv_async()
            .await
            .map_err(|_| BridgeError::ServiceTimeout(service.to_string()))?;
        match reply.result() {
            Ok(sample) => decode(&sample.payload().to_bytes()),
            Err(err) => Err(BridgeError::ServiceFailed {
                service: service.to_string(),
                reason: String::from_utf8_lossy(&err.payload().to_bytes()).into_owned(),
            }),
        }
    }

    async fn close(&self) -> Result<()> {
        for (_, task) in lock(&self.subscriptions).drain() {
            task.abort();
        }
        let publishers: Vec<_> = self.publishers.lock().await.drain().collect();
        for (_, publisher) in publishers {
            publisher.undeclare().await?;
        }
        info!("Closing Zenoh session");
        self.session.close().await?;
        Ok(())
    }
}
