//! rosbridge v2 client over a WebSocket.
//!
//! One writer task drains an outgoing frame queue into the socket; one
//! reader task routes inbound `publish` frames to subscriber channels and
//! `service_response` frames to the caller awaiting that request id.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::{Result, Transport};
use crate::config::{SERVICE_MESSAGE_DETAILS, SERVICE_TOPIC_TYPE};
use crate::error::BridgeError;

struct Subscription {
    id: String,
    tx: mpsc::Sender<Value>,
}

/// State shared between the transport handle and its reader task
#[derive(Default)]
struct Shared {
    pending: Mutex<HashMap<String, oneshot::Sender<Result<Value>>>>,
    subscriptions: Mutex<HashMap<String, Subscription>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    /// Route one inbound text frame
    fn dispatch(&self, text: &str) {
        let frame: Value = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping malformed rosbridge frame: {}", e);
                return;
            }
        };

        match frame.get("op").and_then(Value::as_str) {
            Some("publish") => self.on_publish(frame),
            Some("service_response") => self.on_service_response(frame),
            Some("status") => {
                let level = frame.get("level").and_then(Value::as_str).unwrap_or("info");
                let msg = frame.get("msg").and_then(Value::as_str).unwrap_or("");
                if level == "error" || level == "warning" {
                    warn!("rosbridge status ({}): {}", level, msg);
                } else {
                    debug!("rosbridge status ({}): {}", level, msg);
                }
            }
            other => debug!("Ignoring rosbridge op {:?}", other),
        }
    }

    fn on_publish(&self, mut frame: Value) {
        let Some(topic) = frame.get("topic").and_then(Value::as_str).map(str::to_owned) else {
            warn!("publish frame without topic");
            return;
        };
        let msg = frame.get_mut("msg").map(Value::take).unwrap_or(Value::Null);

        let subscriptions = lock(&self.subscriptions);
        if let Some(sub) = subscriptions.get(&topic) {
            match sub.tx.try_send(msg) {
                Ok(()) => {}
                // Queue full: dropping newest while the consumer lags
                Err(mpsc::error::TrySendError::Full(_)) => {
                    debug!("Subscriber on {} lagging, dropping message", topic)
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("Subscriber on {} gone", topic)
                }
            }
        }
    }

    fn on_service_response(&self, mut frame: Value) {
        let Some(id) = frame.get("id").and_then(Value::as_str).map(str::to_owned) else {
            warn!("service_response without id");
            return;
        };
        let Some(waiter) = lock(&self.pending).remove(&id) else {
            debug!("No caller waiting for {}", id);
            return;
        };

        let service = frame
            .get("service")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let values = frame.get_mut("values").map(Value::take).unwrap_or(Value::Null);
        let ok = frame.get("result").and_then(Value::as_bool).unwrap_or(true);

        let response = if ok {
            Ok(values)
        } else {
            let reason = match values {
                Value::String(s) => s,
                other => other.to_string(),
            };
            Err(BridgeError::ServiceFailed { service, reason })
        };
        let _ = waiter.send(response);
    }

    /// Connection is gone: fail waiting callers and end subscriber streams
    fn shutdown(&self) {
        for (_, waiter) in lock(&self.pending).drain() {
            let _ = waiter.send(Err(BridgeError::Closed));
        }
        lock(&self.subscriptions).clear();
    }
}

/// rosbridge WebSocket transport
pub struct RosbridgeTransport {
    url: String,
    outgoing: mpsc::UnboundedSender<Message>,
    shared: Arc<Shared>,
    advertised: Mutex<HashSet<String>>,
    next_id: AtomicU64,
    service_timeout: Duration,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl RosbridgeTransport {
    /// Connect to a rosbridge server, e.g. `ws://192.168.149.1:9090`
    pub async fn connect(
        url: &str,
        connect_timeout: Duration,
        service_timeout: Duration,
    ) -> Result<Self> {
        info!("Connecting to rosbridge at {}", url);
        let (ws, _response) = tokio::time::timeout(connect_timeout, connect_async(url))
            .await
            .map_err(|_| BridgeError::ConnectTimeout(url.to_string()))??;
        let (mut sink, mut stream) = ws.split();

        let (outgoing, mut queue) = mpsc::unbounded_channel::<Message>();
        let writer = tokio::spawn(async move {
            while let Some(msg) = queue.recv().await {
                let closing = matches!(msg, Message::Close(_));
                if let Err(e) = sink.send(msg).await {
                    warn!("rosbridge write failed: {}", e);
                    break;
                }
                if closing {
                    break;
                }
            }
        });

        let shared = Arc::new(Shared::default());
        let reader_shared = Arc::clone(&shared);
        let reader = tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => reader_shared.dispatch(text.as_str()),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("rosbridge read failed: {}", e);
                        break;
                    }
                }
            }
            info!("rosbridge connection closed");
            reader_shared.shutdown();
        });

        info!("Connected to rosbridge at {}", url);
        Ok(Self {
            url: url.to_string(),
            outgoing,
            shared,
            advertised: Mutex::new(HashSet::new()),
            next_id: AtomicU64::new(1),
            service_timeout,
            tasks: Mutex::new(vec![writer, reader]),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self, op: &str, name: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{}:{}:{}", op, name, n)
    }

    fn send(&self, frame: Value) -> Result<()> {
        debug!("-> {}", frame);
        self.outgoing
            .send(Message::Text(frame.to_string().into()))
            .map_err(|_| BridgeError::Closed)
    }
}

#[async_trait]
impl Transport for RosbridgeTransport {
    async fn topic_type(&self, topic: &str) -> Result<String> {
        let values = self
            .call_service(SERVICE_TOPIC_TYPE, json!({ "topic": topic }))
            .await?;
        match values.get("type").and_then(Value::as_str) {
            Some(t) if !t.is_empty() => Ok(t.to_string()),
            _ => Err(BridgeError::UnknownTopic(topic.to_string())),
        }
    }

    async fn message_details(&self, msg_type: &str) -> Result<Value> {
        self.call_service(SERVICE_MESSAGE_DETAILS, json!({ "type": msg_type }))
            .await
    }

    async fn advertise(&self, topic: &str, msg_type: &str, queue_size: u32) -> Result<()> {
        let id = self.next_id("advertise", topic);
        self.send(json!({
            "op": "advertise",
            "id": id,
            "topic": topic,
            "type": msg_type,
            "queue_size": queue_size,
        }))?;
        lock(&self.advertised).insert(topic.to_string());
        Ok(())
    }

    async fn unadvertise(&self, topic: &str) -> Result<()> {
        if lock(&self.advertised).remove(topic) {
            self.send(json!({ "op": "unadvertise", "topic": topic }))?;
        }
        Ok(())
    }

    async fn publish(&self, topic: &str, msg: Value) -> Result<()> {
        if !lock(&self.advertised).contains(topic) {
            return Err(BridgeError::Protocol(format!(
                "publish on {} before advertise",
                topic
            )));
        }
        self.send(json!({ "op": "publish", "topic": topic, "msg": msg }))
    }

    async fn subscribe(
        &self,
        topic: &str,
        msg_type: &str,
        queue_length: u32,
    ) -> Result<mpsc::Receiver<Value>> {
        self.unsubscribe(topic).await?;

        let id = self.next_id("subscribe", topic);
        let (tx, rx) = mpsc::channel(queue_length.max(1) as usize);
        lock(&self.shared.subscriptions).insert(
            topic.to_string(),
            Subscription {
                id: id.clone(),
                tx,
            },
        );
        self.send(json!({
            "op": "subscribe",
            "id": id,
            "topic": topic,
            "type": msg_type,
            "queue_length": queue_length,
        }))?;
        Ok(rx)
    }

    async fn unsubscribe(&self, topic: &str) -> Result<()> {
        let removed = lock(&self.shared.subscriptions).remove(topic);
        if let Some(sub) = removed {
            self.send(json!({ "op": "unsubscribe", "id": sub.id, "topic": topic }))?;
        }
        Ok(())
    }

    async fn call_service(&self, service: &str, args: Value) -> Result<Value> {
        let id = self.next_id("call_service", service);
        let (tx, rx) = oneshot::channel();
        lock(&self.shared.pending).insert(id.clone(), tx);

        if let Err(e) = self.send(json!({
            "op": "call_service",
            "id": id,
            "service": service,
            "args": args,
        })) {
            lock(&self.shared.pending).remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(self.service_timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => Err(BridgeError::Closed),
            Err(_) => {
                lock(&self.shared.pending).remove(&id);
                Err(BridgeError::ServiceTimeout(service.to_string()))
            }
        }
    }

    async fn close(&self) -> Result<()> {
        info!("Closing rosbridge connection to {}", self.url);
        // Writer may already be gone if the server hung up first
        let _ = self.outgoing.send(Message::Close(None));

        let tasks: Vec<_> = lock(&self.tasks).drain(..).collect();
        let mut tasks = tasks.into_iter();
        if let Some(writer) = tasks.next() {
            let _ = tokio::time::timeout(Duration::from_secs(1), writer).await;
        }
        for task in tasks {
            task.abort();
        }
        self.shared.shutdown();
        Ok(())
    }
}

impl Drop for RosbridgeTransport {
    fn drop(&mut self) {
        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }
    }
}
