//! Private message entities.

pub mod model;

pub use model::{Message, MessageAdminView, MessageView, NewMessage};
