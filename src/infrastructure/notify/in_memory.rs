use crate::core::errors::TallyError;
use crate::infrastructure::notify::{Notification, Notifier};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::mpsc;
use uuid::Uuid;

const OBSERVER_CHANNEL_CAPACITY: usize = 64;

/// Observer registry keyed by (event, user). A subscriber whose channel is
/// closed or full is removed on the first failed send rather than retried.
#[derive(Clone, Default)]
pub struct InMemoryNotifier {
    observers: Arc<RwLock<HashMap<(Uuid, Uuid), mpsc::Sender<Notification>>>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for one event and hand back its receiving end.
    pub async fn subscribe(&self, event_id: Uuid, user_id: Uuid) -> mpsc::Receiver<Notification> {
        let (tx, rx) = mpsc::channel(OBSERVER_CHANNEL_CAPACITY);
        let mut observers = self.observers.write().await;
        observers.insert((event_id, user_id), tx);
        rx
    }

    pub async fn unsubscribe(&self, event_id: Uuid, user_id: Uuid) {
        let mut observers = self.observers.write().await;
        observers.remove(&(event_id, user_id));
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), TallyError> {
        let targets: Vec<(Uuid, Uuid)> = {
            let observers = self.observers.read().await;
            observers
                .keys()
                .filter(|(event_id, _)| *event_id == notification.event_id)
                .copied()
                .collect()
        };

        let mut dead = Vec::new();
        {
            let observers = self.observers.read().await;
            for key in &targets {
                if let Some(tx) = observers.get(key) {
                    if tx.try_send(notification.clone()).is_err() {
                        dead.push(*key);
                    }
                }
            }
        }

        if !dead.is_empty() {
            let mut observers = self.observers.write().await;
            for key in dead {
                debug!("dropping unreachable observer {:?}", key);
                observers.remove(&key);
            }
        }

        Ok(())
    }
}
