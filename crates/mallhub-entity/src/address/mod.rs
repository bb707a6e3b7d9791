//! Shipping address entities.

pub mod model;

pub use model::{Address, AddressView, NewAddress};
