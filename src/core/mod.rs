pub mod balances;
pub mod errors;
pub mod models;
pub mod reduce;
pub mod services;
pub mod split;
