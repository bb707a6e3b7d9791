//! Shipping addresses with a single default per owner.

pub mod service;

pub use service::{AddressService, CreateAddressRequest, UpdateAddressRequest};

/// Message for a lookup of an address that is not there (or not the caller's).
pub const ERR_ADDRESS_NOT_EXIST: &str = "address does not exist";
