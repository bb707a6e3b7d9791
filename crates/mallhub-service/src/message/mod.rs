//! Private messages from admins to users.

pub mod service;

pub use service::{CreateMessageRequest, MessageService};

pub const ERR_MESSAGE_NOT_EXIST: &str = "message does not exist";
