//! Core traits defined in `mallhub-core` and implemented by other crates.

pub mod ttl_store;

pub use ttl_store::TtlStore;
