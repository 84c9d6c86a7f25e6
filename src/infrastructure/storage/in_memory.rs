use crate::core::balances::LedgerSnapshot;
use crate::core::errors::TallyError;
use crate::core::models::{
    Contribution, Event, Expense, ExpenseShare, Settlement, SettlementDraft, SettlementStatus, User,
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
    participants: Arc<RwLock<HashMap<Uuid, Vec<Uuid>>>>,
    contributions: Arc<RwLock<HashMap<Uuid, Vec<Contribution>>>>,
    expenses: Arc<RwLock<HashMap<Uuid, Expense>>>,
    shares: Arc<RwLock<HashMap<Uuid, Vec<ExpenseShare>>>>,
    settlements: Arc<RwLock<HashMap<Uuid, Settlement>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_user(&self, user: User) -> Result<User, TallyError> {
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, TallyError> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn save_event(&self, event: Event) -> Result<Event, TallyError> {
        let mut events = self.events.write().await;
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>, TallyError> {
        let events = self.events.read().await;
        Ok(events.get(&event_id).cloned())
    }

    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), TallyError> {
        let mut participants = self.participants.write().await;
        let entry = participants.entry(event_id).or_default();
        if !entry.contains(&user_id) {
            entry.push(user_id);
        }
        Ok(())
    }

    async fn participants(&self, event_id: Uuid) -> Result<Vec<Uuid>, TallyError> {
        let participants = self.participants.read().await;
        Ok(participants.get(&event_id).cloned().unwrap_or_default())
    }

    async fn is_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, TallyError> {
        let participants = self.participants.read().await;
        Ok(participants
            .get(&event_id)
            .map(|p| p.contains(&user_id))
            .unwrap_or(false))
    }

    async fn ledger_snapshot(&self, event_id: Uuid) -> Result<LedgerSnapshot, TallyError> {
        // Hold all four read locks at once so the snapshot is consistent
        // with respect to the atomic writers below.
        let participants = self.participants.read().await;
        let contributions = self.contributions.read().await;
        let expenses = self.expenses.read().await;
        let shares = self.shares.read().await;

        let event_expenses: Vec<Expense> = expenses
            .values()
            .filter(|e| e.event_id == event_id)
            .cloned()
            .collect();
        let event_shares = event_expenses
            .iter()
            .flat_map(|e| shares.get(&e.id).cloned().unwrap_or_default())
            .collect();

        Ok(LedgerSnapshot {
            participants: participants.get(&event_id).cloned().unwrap_or_default(),
            contributions: contributions.get(&event_id).cloned().unwrap_or_default(),
            expenses: event_expenses,
            shares: event_shares,
        })
    }

    async fn save_contribution(&self, contribution: Contribution) -> Result<Contribution, TallyError> {
        let mut contributions = self.contributions.write().await;
        contributions
            .entry(contribution.event_id)
            .or_default()
            .push(contribution.clone());
        Ok(contribution)
    }

    async fn insert_expense_with_shares(
        &self,
        expense: Expense,
        expense_shares: Vec<ExpenseShare>,
    ) -> Result<Expense, TallyError> {
        let mut expenses = self.expenses.write().await;
        let mut shares = self.shares.write().await;
        expenses.insert(expense.id, expense.clone());
        shares.insert(expense.id, expense_shares);
        Ok(expense)
    }

    async fn replace_pending_settlements(
        &self,
        event_id: Uuid,
        currency: &str,
        drafts: Vec<SettlementDraft>,
    ) -> Result<Vec<Settlement>, TallyError> {
        // One write lock spans both the delete and the insert, so readers
        // observe either the old pending set or the new one, never a mix.
        let mut settlements = self.settlements.write().await;
        settlements.retain(|_, s| !(s.event_id == event_id && s.status == SettlementStatus::Pending));

        let now = Utc::now();
        let created: Vec<Settlement> = drafts
            .into_iter()
            .map(|d| Settlement {
                id: Uuid::new_v4(),
                event_id,
                from_user_id: d.from_user_id,
                to_user_id: d.to_user_id,
                amount: d.amount,
                currency: currency.to_string(),
                status: SettlementStatus::Pending,
                payment_reference: None,
                settled_at: None,
                created_at: now,
            })
            .collect();

        for settlement in &created {
            settlements.insert(settlement.id, settlement.clone());
        }
        Ok(created)
    }

    async fn save_settlement(&self, settlement: Settlement) -> Result<Settlement, TallyError> {
        let mut settlements = self.settlements.write().await;
        settlements.insert(settlement.id, settlement.clone());
        Ok(settlement)
    }

    async fn get_settlement(&self, settlement_id: Uuid) -> Result<Option<Settlement>, TallyError> {
        let settlements = self.settlements.read().await;
        Ok(settlements.get(&settlement_id).cloned())
    }

    async fn update_settlement(&self, settlement: Settlement) -> Result<Settlement, TallyError> {
        let mut settlements = self.settlements.write().await;
        if !settlements.contains_key(&settlement.id) {
            return Err(TallyError::SettlementNotFound(settlement.id));
        }
        settlements.insert(settlement.id, settlement.clone());
        Ok(settlement)
    }

    async fn event_settlements(&self, event_id: Uuid) -> Result<Vec<Settlement>, TallyError> {
        let settlements = self.settlements.read().await;
        let mut result: Vec<Settlement> = settlements
            .values()
            .filter(|s| s.event_id == event_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn user_settlements(&self, event_id: Uuid, user_id: Uuid) -> Result<Vec<Settlement>, TallyError> {
        let settlements = self.settlements.read().await;
        let mut result: Vec<Settlement> = settlements
            .values()
            .filter(|s| s.event_id == event_id && (s.from_user_id == user_id || s.to_user_id == user_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}
