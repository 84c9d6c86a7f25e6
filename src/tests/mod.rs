mod split_tests;

use crate::config::CONFIG;
use crate::core::models::{Event, User};
use crate::infrastructure::notify::Notifier;
use crate::infrastructure::storage::Storage;
use crate::{InMemoryNotifier, InMemoryStorage, TallyService};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn init_test_logging() {
    let _ = env_logger::Builder::new()
        .parse_filters(&CONFIG.log_level)
        .try_init();
}

pub fn create_test_service() -> TallyService<InMemoryStorage, InMemoryNotifier> {
    init_test_logging();
    TallyService::new(InMemoryStorage::new(), InMemoryNotifier::new())
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Create an event with one participant per name and hand back their ids in
/// the same order.
pub async fn setup_event<S: Storage, N: Notifier>(
    service: &TallyService<S, N>,
    names: &[&str],
) -> (Event, Vec<Uuid>) {
    let event = service
        .storage()
        .save_event(Event::new("Trip", CONFIG.default_currency.clone()))
        .await
        .unwrap();

    let mut user_ids = Vec::new();
    for name in names {
        let user = service
            .storage()
            .save_user(User::new(*name, format!("{}@example.com", name.to_lowercase())))
            .await
            .unwrap();
        service
            .storage()
            .add_participant(event.id, user.id)
            .await
            .unwrap();
        user_ids.push(user.id);
    }

    (event, user_ids)
}
