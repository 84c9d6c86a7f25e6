use crate::constants::MAX_AMOUNT;
use crate::core::balances::calculate_balances;
use crate::core::errors::TallyError;
use crate::core::models::{
    Contribution, Event, Expense, ExpenseShare, ExpenseStatus, Settlement, SettlementStatus,
    SplitParticipant, SplitType, UserBalance,
};
use crate::core::{reduce, split};
use crate::infrastructure::notify::{Notification, NotificationKind, Notifier};
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Aggregate view of an event's outstanding debt and settlement progress.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub total_owed: Decimal,
    pub total_owes: Decimal,
    pub users_in_debt: usize,
    pub users_in_credit: usize,
    pub pending_settlements: usize,
    pub completed_settlements: usize,
    pub total_pending_amount: Decimal,
    pub balances: Vec<UserBalance>,
    pub settlements: Vec<Settlement>,
}

/// Balance and settlement engine for one ledger store.
///
/// All state lives in the storage collaborator; the service itself only
/// holds the per-event generation locks that serialize concurrent
/// `generate_settlements` calls for the same event.
pub struct TallyService<S: Storage, N: Notifier> {
    storage: S,
    notifier: N,
    generation_locks: Arc<RwLock<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl<S: Storage, N: Notifier> TallyService<S, N> {
    pub fn new(storage: S, notifier: N) -> Self {
        TallyService {
            storage,
            notifier,
            generation_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn require_event(&self, event_id: Uuid) -> Result<Event, TallyError> {
        self.storage
            .get_event(event_id)
            .await?
            .ok_or(TallyError::EventNotFound(event_id))
    }

    async fn require_participant(&self, event_id: Uuid, user_id: Uuid) -> Result<(), TallyError> {
        if !self.storage.is_participant(event_id, user_id).await? {
            return Err(TallyError::NotParticipant(user_id));
        }
        Ok(())
    }

    fn validate_amount(&self, amount: Decimal) -> Result<(), TallyError> {
        if amount <= Decimal::ZERO {
            return Err(TallyError::NonPositiveAmount);
        }
        if amount > MAX_AMOUNT {
            return Err(TallyError::AmountTooLarge(amount));
        }
        Ok(())
    }

    /// Delivery is the notifier's problem; a failed announce is logged and
    /// never fails the ledger operation that triggered it.
    async fn announce(&self, kind: NotificationKind, event_id: Uuid, payload: serde_json::Value) {
        if let Err(e) = self
            .notifier
            .notify(Notification::new(kind, event_id, payload))
            .await
        {
            warn!("notification delivery failed for event {}: {}", event_id, e);
        }
    }

    async fn generation_lock(&self, event_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.generation_locks.write().await;
        locks
            .entry(event_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    #[cfg(test)]
    pub(crate) async fn generation_lock_count(&self) -> usize {
        self.generation_locks.read().await.len()
    }

    // LEDGER MUTATIONS

    pub async fn add_contribution(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
        notes: Option<String>,
    ) -> Result<Contribution, TallyError> {
        info!("Adding contribution of {} by user {} to event {}", amount, user_id, event_id);
        let event = self.require_event(event_id).await?;
        self.require_participant(event_id, user_id).await?;
        self.validate_amount(amount)?;

        let contribution = Contribution {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            amount,
            currency: event.currency.clone(),
            notes,
            timestamp: Utc::now(),
        };
        let saved = self.storage.save_contribution(contribution).await?;

        self.announce(
            NotificationKind::ContributionAdded,
            event_id,
            json!({ "contribution_id": saved.id, "user_id": user_id, "amount": saved.amount }),
        )
        .await;
        self.announce(
            NotificationKind::BalanceUpdated,
            event_id,
            json!({ "user_id": user_id }),
        )
        .await;
        Ok(saved)
    }

    /// Submit an expense, splitting it into shares in the same atomic write.
    ///
    /// An empty participant list means "split across all current event
    /// participants". Initial status is approved when the event's approval
    /// settings cover the amount, pending otherwise.
    pub async fn add_expense(
        &self,
        event_id: Uuid,
        submitted_by: Uuid,
        amount: Decimal,
        description: String,
        split_type: SplitType,
        mut participants: Vec<SplitParticipant>,
    ) -> Result<(Expense, Vec<ExpenseShare>), TallyError> {
        info!(
            "Adding {:?}-split expense of {} by user {} to event {}",
            split_type, amount, submitted_by, event_id
        );
        let event = self.require_event(event_id).await?;
        self.require_participant(event_id, submitted_by).await?;
        self.validate_amount(amount)?;

        if participants.is_empty() {
            participants = self
                .storage
                .participants(event_id)
                .await?
                .into_iter()
                .map(SplitParticipant::bare)
                .collect();
        }
        for p in &participants {
            self.require_participant(event_id, p.user_id).await?;
        }

        let status = if event.auto_approves(amount) {
            ExpenseStatus::Approved
        } else {
            ExpenseStatus::Pending
        };

        let expense = Expense {
            id: Uuid::new_v4(),
            event_id,
            submitted_by,
            amount,
            currency: event.currency.clone(),
            description,
            status,
            split_type,
            submitted_at: Utc::now(),
        };
        let shares = split::compute_shares(expense.id, amount, split_type, &participants)?;

        let saved = self
            .storage
            .insert_expense_with_shares(expense, shares.clone())
            .await?;
        debug!("Expense {} stored with {} shares as {:?}", saved.id, shares.len(), saved.status);

        self.announce(
            NotificationKind::ExpenseAdded,
            event_id,
            json!({
                "expense_id": saved.id,
                "submitted_by": submitted_by,
                "amount": saved.amount,
                "status": saved.status
            }),
        )
        .await;
        if saved.status.counts_toward_balances() {
            self.announce(
                NotificationKind::BalanceUpdated,
                event_id,
                json!({ "user_ids": shares.iter().map(|s| s.user_id).collect::<Vec<_>>() }),
            )
            .await;
        }
        Ok((saved, shares))
    }

    // BALANCES

    /// Net position of every participant, recomputed from the ledger.
    pub async fn balances(&self, event_id: Uuid) -> Result<Vec<UserBalance>, TallyError> {
        self.require_event(event_id).await?;
        let snapshot = self.storage.ledger_snapshot(event_id).await?;
        Ok(calculate_balances(&snapshot))
    }

    // SETTLEMENT LIFECYCLE

    /// Recompute balances, reduce them to payment instructions and replace
    /// the event's pending settlements with the fresh set.
    ///
    /// The whole read-compute-write cycle runs under a per-event lock, so two
    /// concurrent generations for the same event cannot interleave; the
    /// storage swap itself is atomic, so a failure leaves the prior pending
    /// rows untouched.
    pub async fn generate_settlements(&self, event_id: Uuid) -> Result<Vec<Settlement>, TallyError> {
        let lock = self.generation_lock(event_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.regenerate(event_id).await
        };
        drop(lock);

        // Drop the lock entry once no other generation holds or awaits it,
        // so the map does not grow by one entry per event forever.
        let mut locks = self.generation_locks.write().await;
        if locks.get(&event_id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(&event_id);
        }
        result
    }

    async fn regenerate(&self, event_id: Uuid) -> Result<Vec<Settlement>, TallyError> {
        info!("Generating settlements for event {}", event_id);
        let event = self.require_event(event_id).await?;
        let snapshot = self.storage.ledger_snapshot(event_id).await?;
        let balances = calculate_balances(&snapshot);
        let drafts = reduce::reduce(&balances);
        debug!("Reduced {} balances into {} settlements", balances.len(), drafts.len());

        let settlements = self
            .storage
            .replace_pending_settlements(event_id, &event.currency, drafts)
            .await?;

        self.announce(
            NotificationKind::SettlementsGenerated,
            event_id,
            json!({ "settlements": &settlements }),
        )
        .await;
        Ok(settlements)
    }

    /// Record a direct payment between two specific participants.
    ///
    /// Coexists with generated settlements: it neither consults nor replaces
    /// the pending set produced by `generate_settlements`.
    pub async fn create_custom_settlement(
        &self,
        event_id: Uuid,
        from_user_id: Uuid,
        to_user_id: Uuid,
        amount: Decimal,
    ) -> Result<Settlement, TallyError> {
        info!(
            "Creating custom settlement of {} from {} to {} in event {}",
            amount, from_user_id, to_user_id, event_id
        );
        let event = self.require_event(event_id).await?;
        self.require_participant(event_id, from_user_id).await?;
        self.require_participant(event_id, to_user_id).await?;
        if from_user_id == to_user_id {
            return Err(TallyError::SelfSettlement);
        }
        self.validate_amount(amount)?;

        let balances = self.balances(event_id).await?;
        let from = balances
            .iter()
            .find(|b| b.user_id == from_user_id)
            .ok_or(TallyError::NotParticipant(from_user_id))?;
        let to = balances
            .iter()
            .find(|b| b.user_id == to_user_id)
            .ok_or(TallyError::NotParticipant(to_user_id))?;

        if from.net_balance >= Decimal::ZERO {
            return Err(TallyError::NoDebt(from_user_id));
        }
        if to.net_balance <= Decimal::ZERO {
            return Err(TallyError::NoCredit(to_user_id));
        }
        if amount > from.owes_amount {
            return Err(TallyError::ExceedsDebt(from_user_id));
        }
        if amount > to.owed_amount {
            return Err(TallyError::ExceedsCredit(to_user_id));
        }

        let settlement = Settlement {
            id: Uuid::new_v4(),
            event_id,
            from_user_id,
            to_user_id,
            amount,
            currency: event.currency,
            status: SettlementStatus::Pending,
            payment_reference: None,
            settled_at: None,
            created_at: Utc::now(),
        };
        let saved = self.storage.save_settlement(settlement).await?;

        self.announce(
            NotificationKind::SettlementCreated,
            event_id,
            json!({ "settlement": &saved }),
        )
        .await;
        Ok(saved)
    }

    /// Complete a pending settlement. Terminal: there is no path back.
    pub async fn mark_completed(
        &self,
        settlement_id: Uuid,
        payment_reference: Option<String>,
    ) -> Result<Settlement, TallyError> {
        info!("Marking settlement {} completed", settlement_id);
        let mut settlement = self
            .storage
            .get_settlement(settlement_id)
            .await?
            .ok_or(TallyError::SettlementNotFound(settlement_id))?;

        if settlement.status != SettlementStatus::Pending {
            warn!(
                "Rejecting completion of settlement {} in state {:?}",
                settlement_id, settlement.status
            );
            return Err(TallyError::SettlementNotPending(settlement_id));
        }

        settlement.status = SettlementStatus::Completed;
        settlement.payment_reference = payment_reference;
        settlement.settled_at = Some(Utc::now());
        let saved = self.storage.update_settlement(settlement).await?;

        self.announce(
            NotificationKind::SettlementCompleted,
            saved.event_id,
            json!({ "settlement": &saved }),
        )
        .await;
        Ok(saved)
    }

    // READ-ONLY PROJECTIONS

    pub async fn event_settlements(&self, event_id: Uuid) -> Result<Vec<Settlement>, TallyError> {
        self.require_event(event_id).await?;
        self.storage.event_settlements(event_id).await
    }

    pub async fn user_settlements(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Settlement>, TallyError> {
        self.require_event(event_id).await?;
        self.storage.user_settlements(event_id, user_id).await
    }

    pub async fn settlement_summary(&self, event_id: Uuid) -> Result<SettlementSummary, TallyError> {
        let balances = self.balances(event_id).await?;
        let settlements = self.storage.event_settlements(event_id).await?;

        let mut summary = SettlementSummary {
            total_owed: Decimal::ZERO,
            total_owes: Decimal::ZERO,
            users_in_debt: 0,
            users_in_credit: 0,
            pending_settlements: 0,
            completed_settlements: 0,
            total_pending_amount: Decimal::ZERO,
            balances: Vec::new(),
            settlements: Vec::new(),
        };

        for balance in &balances {
            if balance.net_balance < Decimal::ZERO {
                summary.total_owes += balance.owes_amount;
                summary.users_in_debt += 1;
            } else if balance.net_balance > Decimal::ZERO {
                summary.total_owed += balance.owed_amount;
                summary.users_in_credit += 1;
            }
        }
        for settlement in &settlements {
            match settlement.status {
                SettlementStatus::Pending => {
                    summary.pending_settlements += 1;
                    summary.total_pending_amount += settlement.amount;
                }
                SettlementStatus::Completed => summary.completed_settlements += 1,
                SettlementStatus::Cancelled => {}
            }
        }

        summary.balances = balances;
        summary.settlements = settlements;
        Ok(summary)
    }
}
