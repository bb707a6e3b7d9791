//! In-process TTL store.

pub mod store;

pub use store::MemoryTtlStore;
