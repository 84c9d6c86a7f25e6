pub mod notify;
pub mod storage;
