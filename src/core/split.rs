//! Expense splitting: divides one expense's amount into per-user shares
//! under the four splitting strategies. Pure computation; the caller persists
//! the result in the same transaction as the parent expense.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::constants::MINOR_UNIT_DP;
use crate::core::errors::TallyError;
use crate::core::models::{ExpenseShare, SplitParticipant, SplitType};

/// Compute the shares for one expense.
///
/// The participant list must already be resolved: an empty list is an error
/// here, substituting "all event participants" is the caller's job.
///
/// Exactness guarantees: for `Percentage` and `Custom` the share amounts sum
/// to exactly the expense amount (the strategy validates its inputs against
/// that total). For `Equal` and `Weighted` the amounts are rounded to the
/// currency minor unit and the sum may drift from the total by at most one
/// minor unit per participant.
pub fn compute_shares(
    expense_id: Uuid,
    amount: Decimal,
    split_type: SplitType,
    participants: &[SplitParticipant],
) -> Result<Vec<ExpenseShare>, TallyError> {
    if participants.is_empty() {
        return Err(TallyError::NoParticipants);
    }

    match split_type {
        SplitType::Equal => equal_split(expense_id, amount, participants),
        SplitType::Percentage => percentage_split(expense_id, amount, participants),
        SplitType::Custom => custom_split(expense_id, amount, participants),
        SplitType::Weighted => weighted_split(expense_id, amount, participants),
    }
}

fn round_to_minor_unit(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_DP, RoundingStrategy::MidpointAwayFromZero)
}

fn parse_field(
    field: &'static str,
    raw: Option<&String>,
    user_id: Uuid,
) -> Result<Decimal, TallyError> {
    let raw = raw.ok_or(TallyError::MissingField { field, user_id })?;
    Decimal::from_str(raw).map_err(|_| TallyError::InvalidNumber { field, user_id })
}

fn equal_split(
    expense_id: Uuid,
    amount: Decimal,
    participants: &[SplitParticipant],
) -> Result<Vec<ExpenseShare>, TallyError> {
    let count = Decimal::from(participants.len());
    let share_amount = round_to_minor_unit(amount / count);
    let percentage = Decimal::ONE_HUNDRED / count;

    Ok(participants
        .iter()
        .map(|p| ExpenseShare {
            expense_id,
            user_id: p.user_id,
            amount: share_amount,
            percentage,
        })
        .collect())
}

fn percentage_split(
    expense_id: Uuid,
    amount: Decimal,
    participants: &[SplitParticipant],
) -> Result<Vec<ExpenseShare>, TallyError> {
    let mut percentages = Vec::with_capacity(participants.len());
    let mut total = Decimal::ZERO;
    for p in participants {
        let percentage = parse_field("percentage", p.percentage.as_ref(), p.user_id)?;
        total += percentage;
        percentages.push(percentage);
    }

    // Exact decimal equality, no tolerance.
    if total != Decimal::ONE_HUNDRED {
        return Err(TallyError::PercentageMismatch(total));
    }

    Ok(participants
        .iter()
        .zip(percentages)
        .map(|(p, percentage)| ExpenseShare {
            expense_id,
            user_id: p.user_id,
            amount: amount * percentage / Decimal::ONE_HUNDRED,
            percentage,
        })
        .collect())
}

fn custom_split(
    expense_id: Uuid,
    amount: Decimal,
    participants: &[SplitParticipant],
) -> Result<Vec<ExpenseShare>, TallyError> {
    let mut amounts = Vec::with_capacity(participants.len());
    let mut total = Decimal::ZERO;
    for p in participants {
        let share_amount = parse_field("amount", p.amount.as_ref(), p.user_id)?;
        total += share_amount;
        amounts.push(share_amount);
    }

    if total != amount {
        return Err(TallyError::AmountMismatch {
            expected: amount,
            actual: total,
        });
    }

    Ok(participants
        .iter()
        .zip(amounts)
        .map(|(p, share_amount)| ExpenseShare {
            expense_id,
            user_id: p.user_id,
            amount: share_amount,
            percentage: share_amount / amount * Decimal::ONE_HUNDRED,
        })
        .collect())
}

fn weighted_split(
    expense_id: Uuid,
    amount: Decimal,
    participants: &[SplitParticipant],
) -> Result<Vec<ExpenseShare>, TallyError> {
    let mut weights = Vec::with_capacity(participants.len());
    let mut total_weight = Decimal::ZERO;
    for p in participants {
        let weight = parse_field("weight", p.weight.as_ref(), p.user_id)?;
        if weight <= Decimal::ZERO {
            return Err(TallyError::NonPositiveWeight(p.user_id));
        }
        total_weight += weight;
        weights.push(weight);
    }

    Ok(participants
        .iter()
        .zip(weights)
        .map(|(p, weight)| ExpenseShare {
            expense_id,
            user_id: p.user_id,
            amount: round_to_minor_unit(amount * weight / total_weight),
            percentage: weight / total_weight * Decimal::ONE_HUNDRED,
        })
        .collect())
}
