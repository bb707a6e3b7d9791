//! User feedback reports.

pub mod service;

pub use service::{CreateReportRequest, ReportService, UpdateReportStatusRequest};

pub const ERR_REPORT_NOT_EXIST: &str = "report does not exist";
