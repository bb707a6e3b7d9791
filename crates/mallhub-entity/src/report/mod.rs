//! User feedback report entities.

pub mod model;

pub use model::{NewReport, Report, ReportAdminView, ReportStatus, ReportType, ReportView};
