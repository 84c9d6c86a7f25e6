//! Balance calculation: folds the ledger rows of one event into each
//! participant's net position.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::models::{Contribution, Expense, ExpenseShare, UserBalance};

/// A consistent read of every ledger row for one event, as returned by the
/// storage collaborator in a single call. Consumers must not hold one of
/// these across mutations: any new contribution or expense invalidates it.
#[derive(Clone, Debug)]
pub struct LedgerSnapshot {
    pub participants: Vec<Uuid>,
    pub contributions: Vec<Contribution>,
    pub expenses: Vec<Expense>,
    pub shares: Vec<ExpenseShare>,
}

/// Compute the net balance of every participant.
///
/// For each participant: `net = contributed + spent - share_of_expenses`.
/// A submitter's own spend counts as an implicit contribution, offset by
/// their own share, so "I paid the restaurant bill" balances correctly even
/// without an explicit contribution row. Rejected expenses are excluded
/// entirely, making a denial financially inert.
///
/// Returns one `UserBalance` per participant, in participant order; an event
/// with no participants yields an empty vec.
pub fn calculate_balances(snapshot: &LedgerSnapshot) -> Vec<UserBalance> {
    let counted: HashMap<Uuid, &Expense> = snapshot
        .expenses
        .iter()
        .filter(|e| e.status.counts_toward_balances())
        .map(|e| (e.id, e))
        .collect();

    let mut contributed: HashMap<Uuid, Decimal> = HashMap::new();
    for c in &snapshot.contributions {
        *contributed.entry(c.user_id).or_insert(Decimal::ZERO) += c.amount;
    }

    let mut spent: HashMap<Uuid, Decimal> = HashMap::new();
    for e in counted.values() {
        *spent.entry(e.submitted_by).or_insert(Decimal::ZERO) += e.amount;
    }

    let mut share_of_expenses: HashMap<Uuid, Decimal> = HashMap::new();
    for share in &snapshot.shares {
        if counted.contains_key(&share.expense_id) {
            *share_of_expenses.entry(share.user_id).or_insert(Decimal::ZERO) += share.amount;
        }
    }

    snapshot
        .participants
        .iter()
        .map(|&user_id| {
            UserBalance::from_totals(
                user_id,
                contributed.get(&user_id).copied().unwrap_or(Decimal::ZERO),
                spent.get(&user_id).copied().unwrap_or(Decimal::ZERO),
                share_of_expenses.get(&user_id).copied().unwrap_or(Decimal::ZERO),
            )
        })
        .collect()
}
