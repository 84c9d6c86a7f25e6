use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an expense. Only pending and approved expenses count
/// toward balances; a rejected expense has zero financial effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    pub fn counts_toward_balances(&self) -> bool {
        matches!(self, ExpenseStatus::Pending | ExpenseStatus::Approved)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Percentage,
    Custom,
    Weighted,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub event_id: Uuid,
    pub submitted_by: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub status: ExpenseStatus,
    pub split_type: SplitType,
    pub submitted_at: DateTime<Utc>,
}

/// One user's portion of a single expense. Created atomically alongside its
/// parent expense and never independently mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpenseShare {
    pub expense_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub percentage: Decimal,
}

/// Splitter input: one participant descriptor with the strategy-specific raw
/// value as submitted by the caller. Values arrive as strings so the splitter
/// owns parsing and can report unparseable input per user.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SplitParticipant {
    pub user_id: Uuid,
    pub amount: Option<String>,
    pub percentage: Option<String>,
    pub weight: Option<String>,
}

impl SplitParticipant {
    pub fn bare(user_id: Uuid) -> Self {
        SplitParticipant {
            user_id,
            ..Default::default()
        }
    }
}
