//! Storage layer: canonical models, the abstract store, and its backends.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{ContestFilter, Store, StoreError, UpsertOutcome};
