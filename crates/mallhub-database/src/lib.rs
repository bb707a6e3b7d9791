//! # mallhub-database
//!
//! Store traits for every MallHub table, the transactional scope every
//! operation runs in, and two implementations: PostgreSQL for production
//! and an in-memory database for tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod unit_of_work;

pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use repositories::PgDatabase;
pub use store::{Database, Transaction};
pub use unit_of_work::{panic_message, with_transaction};
