//! Settlement reduction: converts per-user net balances into a small set of
//! pairwise payment instructions that zero out the group's debts.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::models::{SettlementDraft, UserBalance};

/// Greedy debt reduction.
///
/// Debtors and creditors are sorted descending by magnitude (stable, so ties
/// keep the input order and the result is deterministic for a deterministic
/// input). The two heads are matched repeatedly, transferring
/// `min(owes, owed)` each step and dropping whichever party reaches zero.
///
/// Emits at most `min(debtors, creditors)` + the number of partial matches
/// instructions. This is a heuristic, not a minimum-transaction solver; the
/// true minimum-cash-flow problem is NP-hard and not attempted.
pub fn reduce(balances: &[UserBalance]) -> Vec<SettlementDraft> {
    let mut debtors: Vec<(Uuid, Decimal)> = balances
        .iter()
        .filter(|b| b.net_balance < Decimal::ZERO)
        .map(|b| (b.user_id, b.owes_amount))
        .collect();
    let mut creditors: Vec<(Uuid, Decimal)> = balances
        .iter()
        .filter(|b| b.net_balance > Decimal::ZERO)
        .map(|b| (b.user_id, b.owed_amount))
        .collect();

    debtors.sort_by(|a, b| b.1.cmp(&a.1));
    creditors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut drafts = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < debtors.len() && j < creditors.len() {
        let transfer = debtors[i].1.min(creditors[j].1);

        drafts.push(SettlementDraft {
            from_user_id: debtors[i].0,
            to_user_id: creditors[j].0,
            amount: transfer,
        });

        debtors[i].1 -= transfer;
        creditors[j].1 -= transfer;

        if debtors[i].1.is_zero() {
            i += 1;
        }
        if creditors[j].1.is_zero() {
            j += 1;
        }
    }

    drafts
}
