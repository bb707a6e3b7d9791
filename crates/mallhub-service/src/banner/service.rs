//! Banner operations: public listing and admin management.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use mallhub_core::error::AppError;
use mallhub_core::result::AppResult;
use mallhub_core::types::{Paged, Query};
use mallhub_entity::banner::{BannerPlatform, BannerView, NewBanner};

use super::ERR_BANNER_NOT_EXIST;
use crate::unit_of_work::UnitOfWork;
use crate::validation::{Validated, validate};

/// Request to publish a banner.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBannerRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "please provide an image"))]
    pub image: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please provide a link"))]
    pub href: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "please choose a platform"))]
    pub platform: String,
    pub description: Option<String>,
    pub priority: Option<i32>,
}

impl Validated for CreateBannerRequest {
    const FIELDS: &'static [&'static str] = &["image", "href", "platform"];

    fn check_whitelist(&self) -> AppResult<()> {
        self.platform.parse::<BannerPlatform>().map(|_| ())
    }
}

/// List query with an optional platform filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
    pub platform: Option<String>,
}

/// Handles banners.
#[derive(Debug, Clone)]
pub struct BannerService {
    uow: UnitOfWork,
}

impl BannerService {
    pub fn new(uow: UnitOfWork) -> Self {
        Self { uow }
    }

    /// Publishes a banner.
    pub async fn create(&self, input: CreateBannerRequest) -> AppResult<BannerView> {
        validate(&input)?;
        let platform: BannerPlatform = input.platform.parse()?;

        let banner = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.banners()
                        .create(NewBanner {
                            image: input.image,
                            href: input.href,
                            platform,
                            description: input.description,
                            priority: input.priority.unwrap_or_default(),
                        })
                        .await
                })
            })
            .await?;

        info!(banner_id = %banner.id, platform = %banner.platform, "Banner created");
        Ok(BannerView::from(&banner))
    }

    /// Banners by priority, optionally for one platform.
    pub async fn list(&self, input: BannerQuery) -> AppResult<Paged<BannerView>> {
        let platform = input
            .platform
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(str::parse::<BannerPlatform>)
            .transpose()?;
        let query = Query::new(input.page, input.limit).normalize();

        let page = self
            .uow
            .run(move |tx| Box::pin(async move { tx.banners().list(platform, query).await }))
            .await?;
        Ok(page.map(|b| BannerView::from(&b)))
    }

    /// One banner.
    pub async fn get(&self, id: Uuid) -> AppResult<BannerView> {
        let banner = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    tx.banners()
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_BANNER_NOT_EXIST))
                })
            })
            .await?;
        Ok(BannerView::from(&banner))
    }

    /// Removes a banner and returns it.
    pub async fn delete(&self, id: Uuid) -> AppResult<BannerView> {
        let banner = self
            .uow
            .run(move |tx| {
                Box::pin(async move {
                    let banner = tx
                        .banners()
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| AppError::not_found(ERR_BANNER_NOT_EXIST))?;
                    tx.banners().delete(id).await?;
                    Ok(banner)
                })
            })
            .await?;

        info!(banner_id = %id, "Banner deleted");
        Ok(BannerView::from(&banner))
    }
}
