//! Keyed pub/sub fan-out for change notifications.
//!
//! Channels are `tokio::sync::broadcast` senders created lazily per key.
//! Delivery is at-most-once and best-effort: a publish with no active
//! receivers drops the event, and lagging receivers skip missed messages.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

pub struct EventBroadcaster<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    channels: Arc<RwLock<HashMap<K, broadcast::Sender<V>>>>,
    buffer_size: usize,
}

impl<K, V> EventBroadcaster<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            buffer_size,
        }
    }

    /// Subscribe to events for a key, creating the channel on first use.
    pub async fn subscribe(&self, key: K) -> broadcast::Receiver<V> {
        self.get_or_create(key).await.subscribe()
    }

    /// Publish an event, returning the number of receivers it reached.
    /// No active receivers is not an error; the event is simply dropped.
    pub async fn publish(&self, key: K, event: V) -> usize {
        let sender = self.get_or_create(key).await;
        sender.send(event).unwrap_or(0)
    }

    pub async fn receiver_count(&self, key: &K) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(key)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Drop channels with no active receivers; returns how many were removed.
    pub async fn cleanup_idle(&self) -> usize {
        let mut channels = self.channels.write().await;
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        before - channels.len()
    }

    async fn get_or_create(&self, key: K) -> broadcast::Sender<V> {
        // Fast path: read lock only.
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(&key) {
                return sender.clone();
            }
        }

        let mut channels = self.channels.write().await;

        // Re-check: another task may have created it while we waited.
        if let Some(sender) = channels.get(&key) {
            sender.clone()
        } else {
            let (sender, _) = broadcast::channel(self.buffer_size);
            channels.insert(key, sender.clone());
            sender
        }
    }
}

impl<K, V> Clone for EventBroadcaster<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
            buffer_size: self.buffer_size,
        }
    }
}
