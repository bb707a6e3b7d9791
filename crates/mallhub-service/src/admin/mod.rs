//! Back-office administrators.

pub mod service;

pub use service::{AdminService, AdminSigninRequest, AdminSigninView, CreateAdminRequest};

pub const ERR_ADMIN_NOT_EXIST: &str = "admin does not exist";
