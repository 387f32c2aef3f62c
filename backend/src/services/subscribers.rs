//! Live subscriber registry for real-time alerts

use std::collections::HashMap;

use shared::EventMessage;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Handle identifying one live subscriber
pub type SubscriberId = Uuid;

/// Bounded per-subscriber channels
///
/// A send that fails for any reason, including a full buffer, removes the
/// subscriber. Sends never wait, so a slow consumer cannot stall the others.
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<SubscriberId, mpsc::Sender<EventMessage>>>,
    buffer: usize,
}

impl SubscriberRegistry {
    pub fn new(buffer: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Register a subscriber and return its handle and message stream
    pub async fn add(&self) -> (SubscriberId, mpsc::Receiver<EventMessage>) {
        self.add_with_replay(Vec::new()).await
    }

    /// Register a subscriber whose stream starts with `replay`
    ///
    /// The replay is queued before the sender becomes visible to
    /// `broadcast`, so it always precedes live alerts. Messages beyond the
    /// channel capacity are skipped.
    pub async fn add_with_replay(
        &self,
        replay: Vec<EventMessage>,
    ) -> (SubscriberId, mpsc::Receiver<EventMessage>) {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();
        let queued = replay.len();
        for message in replay {
            if let Err(e) = tx.try_send(message) {
                tracing::warn!(subscriber = %id, queued, error = %e, "Replay exceeds subscriber buffer");
                break;
            }
        }
        let total = {
            let mut subscribers = self.subscribers.write().await;
            subscribers.insert(id, tx);
            subscribers.len()
        };
        tracing::info!(subscriber = %id, total, "Subscriber connected");
        (id, rx)
    }

    /// Returns false when the handle was not registered
    pub async fn remove(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(subscriber = %id, "Subscriber disconnected");
        }
        removed
    }

    pub async fn count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Deliver to one subscriber, dropping it on failure
    pub async fn send(&self, id: SubscriberId, message: EventMessage) -> bool {
        let result = match self.subscribers.read().await.get(&id) {
            Some(tx) => tx.try_send(message),
            None => return false,
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(subscriber = %id, error = %e, "Dropping subscriber after failed send");
                self.subscribers.write().await.remove(&id);
                false
            }
        }
    }

    /// Deliver to every subscriber; returns the number of successful deliveries
    pub async fn broadcast(&self, message: &EventMessage) -> usize {
        let mut failed = Vec::new();
        let mut delivered = 0;
        {
            let subscribers = self.subscribers.read().await;
            for (id, tx) in subscribers.iter() {
                match tx.try_send(message.clone()) {
                    Ok(()) => {
                        tracing::debug!(subscriber = %id, "Delivered alert");
                        delivered += 1;
                    }
                    Err(e) => {
                        tracing::warn!(subscriber = %id, error = %e, "Failed to deliver alert");
                        failed.push(*id);
                    }
                }
            }
        }

        if !failed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in &failed {
                subscribers.remove(id);
            }
            tracing::info!(removed = failed.len(), "Removed disconnected subscribers");
        }

        delivered
    }
}
