use super::dec;
use crate::core::errors::TallyError;
use crate::core::split::compute_shares;
use crate::core::models::{SplitParticipant, SplitType};
use rust_decimal::Decimal;
use uuid::Uuid;

fn with_percentage(pct: &str) -> SplitParticipant {
    SplitParticipant {
        user_id: Uuid::new_v4(),
        percentage: Some(pct.to_string()),
        ..Default::default()
    }
}

fn with_amount(amount: &str) -> SplitParticipant {
    SplitParticipant {
        user_id: Uuid::new_v4(),
        amount: Some(amount.to_string()),
        ..Default::default()
    }
}

fn with_weight(weight: &str) -> SplitParticipant {
    SplitParticipant {
        user_id: Uuid::new_v4(),
        weight: Some(weight.to_string()),
        ..Default::default()
    }
}

fn total_amount(shares: &[crate::core::models::ExpenseShare]) -> Decimal {
    shares.iter().map(|s| s.amount).sum()
}

fn total_percentage(shares: &[crate::core::models::ExpenseShare]) -> Decimal {
    shares.iter().map(|s| s.percentage).sum()
}

#[test]
fn equal_split_divides_evenly() {
    let participants: Vec<_> = (0..3).map(|_| SplitParticipant::bare(Uuid::new_v4())).collect();
    let shares = compute_shares(Uuid::new_v4(), dec("90"), SplitType::Equal, &participants).unwrap();

    assert_eq!(shares.len(), 3);
    for share in &shares {
        assert_eq!(share.amount, dec("30"));
    }
    assert_eq!(total_amount(&shares), dec("90"));
}

#[test]
fn equal_split_rounds_to_minor_unit_with_bounded_drift() {
    let participants: Vec<_> = (0..3).map(|_| SplitParticipant::bare(Uuid::new_v4())).collect();
    let shares = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Equal, &participants).unwrap();

    for share in &shares {
        assert_eq!(share.amount, dec("33.33"));
    }
    let drift = (total_amount(&shares) - dec("100")).abs();
    assert!(drift <= dec("0.03"), "drift {} exceeds 3 minor units", drift);
}

#[test]
fn equal_split_rejects_empty_participants() {
    let result = compute_shares(Uuid::new_v4(), dec("90"), SplitType::Equal, &[]);
    assert!(matches!(result, Err(TallyError::NoParticipants)));
}

#[test]
fn percentage_split_is_exact() {
    let participants = vec![with_percentage("60"), with_percentage("40")];
    let shares =
        compute_shares(Uuid::new_v4(), dec("200"), SplitType::Percentage, &participants).unwrap();

    assert_eq!(shares[0].amount, dec("120"));
    assert_eq!(shares[1].amount, dec("80"));
    assert_eq!(total_amount(&shares), dec("200"));
    assert_eq!(total_percentage(&shares), dec("100"));
}

#[test]
fn percentage_split_exact_on_awkward_thirds() {
    let participants = vec![
        with_percentage("33.33"),
        with_percentage("33.33"),
        with_percentage("33.34"),
    ];
    let shares =
        compute_shares(Uuid::new_v4(), dec("100"), SplitType::Percentage, &participants).unwrap();

    assert_eq!(total_amount(&shares), dec("100"));
    assert_eq!(total_percentage(&shares), dec("100"));
}

#[test]
fn percentage_split_requires_percentage_per_participant() {
    let participants = vec![with_percentage("50"), SplitParticipant::bare(Uuid::new_v4())];
    let result = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Percentage, &participants);
    assert!(matches!(result, Err(TallyError::MissingField { field: "percentage", .. })));
}

#[test]
fn percentage_split_rejects_unparseable_input() {
    let participants = vec![with_percentage("fifty"), with_percentage("50")];
    let result = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Percentage, &participants);
    assert!(matches!(result, Err(TallyError::InvalidNumber { field: "percentage", .. })));
}

#[test]
fn percentage_split_rejects_sum_other_than_100() {
    let participants = vec![with_percentage("50"), with_percentage("49")];
    let result = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Percentage, &participants);
    match result {
        Err(TallyError::PercentageMismatch(total)) => assert_eq!(total, dec("99")),
        other => panic!("expected PercentageMismatch, got {:?}", other),
    }
}

#[test]
fn custom_split_is_exact_and_back_computes_percentages() {
    let participants = vec![with_amount("25.50"), with_amount("74.50")];
    let shares = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Custom, &participants).unwrap();

    assert_eq!(shares[0].amount, dec("25.50"));
    assert_eq!(shares[1].amount, dec("74.50"));
    assert_eq!(total_amount(&shares), dec("100"));
    assert_eq!(shares[0].percentage, dec("25.50"));
    assert_eq!(total_percentage(&shares), dec("100"));
}

#[test]
fn custom_split_rejects_amount_mismatch() {
    let participants = vec![with_amount("30"), with_amount("30")];
    let result = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Custom, &participants);
    match result {
        Err(TallyError::AmountMismatch { expected, actual }) => {
            assert_eq!(expected, dec("100"));
            assert_eq!(actual, dec("60"));
        }
        other => panic!("expected AmountMismatch, got {:?}", other),
    }
}

#[test]
fn custom_split_requires_amount_per_participant() {
    let participants = vec![with_amount("100"), SplitParticipant::bare(Uuid::new_v4())];
    let result = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Custom, &participants);
    assert!(matches!(result, Err(TallyError::MissingField { field: "amount", .. })));
}

#[test]
fn weighted_split_distributes_by_weight() {
    let participants = vec![with_weight("1"), with_weight("2"), with_weight("3")];
    let shares = compute_shares(Uuid::new_v4(), dec("60"), SplitType::Weighted, &participants).unwrap();

    assert_eq!(shares[0].amount, dec("10"));
    assert_eq!(shares[1].amount, dec("20"));
    assert_eq!(shares[2].amount, dec("30"));
}

#[test]
fn weighted_split_drift_is_bounded() {
    let participants = vec![with_weight("1"), with_weight("1"), with_weight("1")];
    let shares = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Weighted, &participants).unwrap();

    let drift = (total_amount(&shares) - dec("100")).abs();
    assert!(drift <= dec("0.03"), "drift {} exceeds 3 minor units", drift);
}

#[test]
fn weighted_split_requires_positive_weights() {
    let participants = vec![with_weight("0"), with_weight("2")];
    let result = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Weighted, &participants);
    assert!(matches!(result, Err(TallyError::NonPositiveWeight(_))));

    let participants = vec![with_weight("2"), SplitParticipant::bare(Uuid::new_v4())];
    let result = compute_shares(Uuid::new_v4(), dec("100"), SplitType::Weighted, &participants);
    assert!(matches!(result, Err(TallyError::MissingField { field: "weight", .. })));
}
