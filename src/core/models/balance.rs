use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived net position of one user within an event. Recomputed on demand
/// from the ledger rows; never persisted, never cached across requests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserBalance {
    pub user_id: Uuid,
    pub contributed: Decimal,
    pub spent: Decimal,
    pub net_balance: Decimal,
    pub owes_amount: Decimal,
    pub owed_amount: Decimal,
}

impl UserBalance {
    /// Build a balance from the three aggregates, deriving net and the
    /// owes/owed split from the sign.
    pub fn from_totals(user_id: Uuid, contributed: Decimal, spent: Decimal, share_of_expenses: Decimal) -> Self {
        let net_balance = contributed + spent - share_of_expenses;
        let (owes_amount, owed_amount) = if net_balance < Decimal::ZERO {
            (net_balance.abs(), Decimal::ZERO)
        } else if net_balance > Decimal::ZERO {
            (Decimal::ZERO, net_balance)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        UserBalance {
            user_id,
            contributed,
            spent,
            net_balance,
            owes_amount,
            owed_amount,
        }
    }
}
