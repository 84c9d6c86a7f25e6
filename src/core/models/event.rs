use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A group expense-sharing context (one trip, one household month, ...).
/// Every contribution, expense and settlement is scoped to exactly one event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub currency: String,
    pub require_approval: bool,
    pub auto_approval_limit: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Event {
            id: Uuid::new_v4(),
            name: name.into(),
            currency: currency.into().to_uppercase(),
            require_approval: true,
            auto_approval_limit: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Whether an expense of `amount` skips the approval queue.
    pub fn auto_approves(&self, amount: Decimal) -> bool {
        !self.require_approval
            || (self.auto_approval_limit > Decimal::ZERO && amount <= self.auto_approval_limit)
    }
}
