use crate::core::balances::LedgerSnapshot;
use crate::core::errors::TallyError;
use crate::core::models::{
    Contribution, Event, Expense, ExpenseShare, Settlement, SettlementDraft, User,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence seam for the balance/settlement engine.
///
/// `ledger_snapshot` must return a consistent view of one event's rows.
/// `insert_expense_with_shares` and `replace_pending_settlements` are atomic:
/// a failure leaves the prior state fully intact, never a partial write.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_user(&self, user: User) -> Result<User, TallyError>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, TallyError>;

    async fn save_event(&self, event: Event) -> Result<Event, TallyError>;
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>, TallyError>;
    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), TallyError>;
    async fn participants(&self, event_id: Uuid) -> Result<Vec<Uuid>, TallyError>;
    async fn is_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, TallyError>;

    async fn ledger_snapshot(&self, event_id: Uuid) -> Result<LedgerSnapshot, TallyError>;

    async fn save_contribution(&self, contribution: Contribution) -> Result<Contribution, TallyError>;
    async fn insert_expense_with_shares(
        &self,
        expense: Expense,
        shares: Vec<ExpenseShare>,
    ) -> Result<Expense, TallyError>;

    /// Delete every pending settlement of the event and insert the drafts as
    /// fresh pending settlements, as one atomic unit.
    async fn replace_pending_settlements(
        &self,
        event_id: Uuid,
        currency: &str,
        drafts: Vec<SettlementDraft>,
    ) -> Result<Vec<Settlement>, TallyError>;

    async fn save_settlement(&self, settlement: Settlement) -> Result<Settlement, TallyError>;
    async fn get_settlement(&self, settlement_id: Uuid) -> Result<Option<Settlement>, TallyError>;
    async fn update_settlement(&self, settlement: Settlement) -> Result<Settlement, TallyError>;
    async fn event_settlements(&self, event_id: Uuid) -> Result<Vec<Settlement>, TallyError>;
    async fn user_settlements(&self, event_id: Uuid, user_id: Uuid) -> Result<Vec<Settlement>, TallyError>;
}

pub mod in_memory;
