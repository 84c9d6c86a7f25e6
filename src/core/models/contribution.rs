use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Money a user puts into the shared pool, independent of any expense.
/// Append-only: never mutated after creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}
