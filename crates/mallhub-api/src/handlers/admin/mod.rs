//! Back-office handlers. Every route except sign-in requires an admin token.

pub mod account;
pub mod banner;
pub mod message;
pub mod notification;
pub mod report;
