//! Promotional banners.

pub mod service;

pub use service::{BannerQuery, BannerService, CreateBannerRequest};

pub const ERR_BANNER_NOT_EXIST: &str = "banner does not exist";
