//! SeaORM entities for the `sessions` and `events` tables

pub mod event;
pub mod session;
