//! Banner entities.

pub mod model;

pub use model::{Banner, BannerPlatform, BannerView, NewBanner};
