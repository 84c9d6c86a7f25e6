use crate::core::errors::TallyError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of ledger changes announced to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ContributionAdded,
    ExpenseAdded,
    SettlementsGenerated,
    SettlementCreated,
    SettlementCompleted,
    BalanceUpdated,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub event_id: Uuid,
    pub payload: serde_json::Value,
}

impl Notification {
    pub fn new(kind: NotificationKind, event_id: Uuid, payload: serde_json::Value) -> Self {
        Notification {
            kind,
            event_id,
            payload,
        }
    }
}

/// Fire-and-forget announcement seam. Delivery, retry and fan-out to
/// connected observers belong to the implementation; the engine never waits
/// on an observer and never fails an operation because delivery failed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), TallyError>;
}

pub mod in_memory;
