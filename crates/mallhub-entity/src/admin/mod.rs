//! Admin account entities.

pub mod model;

pub use model::{Admin, AdminField, AdminView, NewAdmin};
