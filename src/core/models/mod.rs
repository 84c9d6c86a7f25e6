pub mod balance;
pub mod contribution;
pub mod event;
pub mod expense;
pub mod settlement;
pub mod user;

pub use balance::UserBalance;
pub use contribution::Contribution;
pub use event::Event;
pub use expense::{Expense, ExpenseShare, ExpenseStatus, SplitParticipant, SplitType};
pub use settlement::{Settlement, SettlementDraft, SettlementStatus};
pub use user::User;
