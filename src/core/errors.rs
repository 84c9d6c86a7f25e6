use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Serialize)]
pub enum TallyError {
    /// Split requested with an empty participant list
    #[error("no participants to split between")]
    NoParticipants,

    /// Strategy-specific field missing for a participant
    #[error("{field} required for user {user_id}")]
    MissingField { field: &'static str, user_id: Uuid },

    /// Strategy-specific field present but unparseable as a decimal
    #[error("invalid {field} for user {user_id}")]
    InvalidNumber { field: &'static str, user_id: Uuid },

    /// Percentage split does not sum to exactly 100
    #[error("percentages must add up to 100, got {0}")]
    PercentageMismatch(Decimal),

    /// Custom split amounts do not sum to exactly the expense amount
    #[error("custom amounts must add up to {expected}, got {actual}")]
    AmountMismatch { expected: Decimal, actual: Decimal },

    /// Weight must be a positive number
    #[error("invalid weight for user {0}: weights must be positive")]
    NonPositiveWeight(Uuid),

    #[error("event {0} not found")]
    EventNotFound(Uuid),

    #[error("user {0} is not a participant in this event")]
    NotParticipant(Uuid),

    #[error("amount must be positive")]
    NonPositiveAmount,

    /// Amount exceeds the single-operation ceiling
    #[error("amount {0} exceeds the maximum allowed")]
    AmountTooLarge(Decimal),

    /// Cannot create a settlement from a user to themselves
    #[error("cannot create settlement to self")]
    SelfSettlement,

    /// Custom settlement: the paying user has no outstanding debt
    #[error("user {0} does not owe money")]
    NoDebt(Uuid),

    /// Custom settlement: the receiving user is not owed anything
    #[error("user {0} is not owed money")]
    NoCredit(Uuid),

    /// Custom settlement amount exceeds what the payer owes
    #[error("amount exceeds what user {0} owes")]
    ExceedsDebt(Uuid),

    /// Custom settlement amount exceeds what the recipient is owed
    #[error("amount exceeds what user {0} is owed")]
    ExceedsCredit(Uuid),

    #[error("settlement {0} not found")]
    SettlementNotFound(Uuid),

    /// Settlement is not pending; completion is a terminal, one-way transition
    #[error("settlement {0} is not pending")]
    SettlementNotPending(Uuid),

    /// Storage collaborator failed; propagated unmodified, never retried here
    #[error("storage error: {0}")]
    Storage(String),

    #[error("notification error: {0}")]
    Notification(String),
}
