//! # mallhub-service
//!
//! Business operations for MallHub. Every operation follows the same shape:
//! validate the input, run one unit of work against the store, and hand a
//! projection back to the caller, which wraps it in the response envelope.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod address;
pub mod admin;
pub mod banner;
pub mod context;
pub mod message;
pub mod notification;
pub mod provider;
pub mod report;
pub mod reset;
#[cfg(test)]
mod testing;
pub mod unit_of_work;
pub mod upload;
pub mod user;
pub mod validation;

pub use address::AddressService;
pub use admin::AdminService;
pub use banner::BannerService;
pub use context::RequestContext;
pub use message::MessageService;
pub use notification::NotificationService;
pub use provider::{Mailer, Telephone};
pub use report::ReportService;
pub use reset::ResetService;
pub use unit_of_work::UnitOfWork;
pub use upload::UploadService;
pub use user::UserService;
