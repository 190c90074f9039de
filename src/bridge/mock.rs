//! Recording transport for unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use super::{Result, Transport};
use crate::error::BridgeError;

/// One call made on the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Advertise { topic: String, msg_type: String },
    Unadvertise { topic: String },
    Publish { topic: String, msg: Value },
    Subscribe { topic: String },
    Unsubscribe { topic: String },
    CallService { service: String, args: Value },
    Close,
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    subscribers: HashMap<String, mpsc::Sender<Value>>,
    failing_services: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Messages published on `topic`, in order
    pub fn published(&self, topic: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Publish { topic: t, msg } if t == topic => Some(msg),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Make `service` answer with a failure
    pub fn fail_service(&self, service: &str, reason: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_services
            .insert(service.to_string(), reason.to_string());
    }

    /// Deliver a message to the subscriber of `topic`
    pub async fn inject(&self, topic: &str, msg: Value) {
        let tx = self.inner.lock().unwrap().subscribers.get(topic).cloned();
        if let Some(tx) = tx {
            tx.send(msg).await.unwrap();
        }
    }

    fn record(&self, call: Call) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn topic_type(&self, topic: &str) -> Result<String> {
        Ok(format!("mock{}", topic))
    }

    async fn message_details(&self, msg_type: &str) -> Result<Value> {
        Ok(json!({ "typedefs": [{ "type": msg_type, "fieldnames": ["x", "y", "yaw_rate"] }] }))
    }

    async fn advertise(&self, topic: &str, msg_type: &str, _queue_size: u32) -> Result<()> {
        self.record(Call::Advertise {
            topic: topic.to_string(),
            msg_type: msg_type.to_string(),
        });
        Ok(())
    }

    async fn unadvertise(&self, topic: &str) -> Result<()> {
        self.record(Call::Unadvertise {
            topic: topic.to_string(),
        });
        Ok(())
    }

    async fn publish(&self, topic: &str, msg: Value) -> Result<()> {
        self.record(Call::Publish {
            topic: topic.to_string(),
            msg,
        });
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &str,
        _msg_type: &str,
        queue_length: u32,
    ) -> Result<mpsc::Receiver<Value>> {
        let (tx, rx) = mpsc::channel(queue_length.max(1) as usize);
        self.inner
            .lock()
            .unwrap()
            .subscribers
            .insert(topic.to_string(), tx);
        self.record(Call::Subscribe {
            topic: topic.to_string(),
        });
        Ok(rx)
    }

    async fn unsubscribe(&self, topic: &str) -> Result<()> {
        self.inner.lock().unwrap().subscribers.remove(topic);
        self.record(Call::Unsubscribe {
            topic: topic.to_string(),
        });
        Ok(())
    }

    async fn call_service(&self, service: &str, args: Value) -> Result<Value> {
        self.record(Call::CallService {
            service: service.to_string(),
            args,
        });
        let failure = self.inner.lock().unwrap().failing_services.get(service).cloned();
        match failure {
            Some(reason) => Err(BridgeError::ServiceFailed {
                service: service.to_string(),
                reason,
            }),
            None => Ok(Value::Null),
        }
    }

    async fn close(&self) -> Result<()> {
        self.inner.lock().unwrap().subscribers.clear();
        self.record(Call::Close);
        Ok(())
    }
}
