//! Hero banner storage with a cached storefront read path.

use crate::error::HeroBannerError;
use chrono::Utc;
use potli_common::cache::TtlCache;
use potli_common::models::HeroBanner;
use potli_db::{generate_id, DbClient, HeroBannerRepository, Repository, SqlHeroBannerRepository};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

pub const ACTIVE_CACHE_KEY: &str = "hero_banners:active";

#[derive(Debug, Clone, Default)]
pub struct CreateHeroBanner {
    pub title: Option<String>,
    pub image_url: String,
    pub redirect_url: Option<String>,
    /// Defaults to active.
    pub is_active: Option<bool>,
    /// Defaults to the end of the list.
    pub sort_order: Option<i64>,
}

/// Partial update. The outer `Option` on nullable fields tells "leave as is"
/// apart from "clear".
#[derive(Debug, Clone, Default)]
pub struct UpdateHeroBanner {
    pub title: Option<Option<String>>,
    pub image_url: Option<String>,
    pub redirect_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}

impl UpdateHeroBanner {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image_url.is_none()
            && self.redirect_url.is_none()
            && self.is_active.is_none()
            && self.sort_order.is_none()
    }

    fn apply(self, banner: &mut HeroBanner) {
        if let Some(title) = self.title {
            banner.title = title;
        }
        if let Some(image_url) = self.image_url {
            banner.image_url = image_url;
        }
        if let Some(redirect_url) = self.redirect_url {
            banner.redirect_url = redirect_url;
        }
        if let Some(is_active) = self.is_active {
            banner.is_active = is_active;
        }
        if let Some(sort_order) = self.sort_order {
            banner.sort_order = sort_order;
        }
    }
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BannerOrder {
    pub id: String,
    pub sort_order: i64,
}

pub struct HeroBannerService {
    repo: SqlHeroBannerRepository,
    cache: TtlCache<Vec<HeroBanner>>,
}

impl HeroBannerService {
    pub fn new(db_client: DbClient, cache_ttl: Duration) -> Self {
        Self {
            repo: SqlHeroBannerRepository::new(db_client),
            cache: TtlCache::new(cache_ttl, 16),
        }
    }

    async fn invalidate(&self) {
        debug!("Invalidating {}", ACTIVE_CACHE_KEY);
        self.cache.invalidate(ACTIVE_CACHE_KEY).await;
    }

    /// All banners by `sort_order`, optionally only active or inactive ones.
    pub async fn list_admin(&self, is_active: Option<bool>) -> Result<Vec<HeroBanner>, HeroBannerError> {
        Ok(self.repo.list(is_active).await?)
    }

    /// Active banners for the storefront, served from cache when fresh.
    pub async fn list_active(&self) -> Result<Vec<HeroBanner>, HeroBannerError> {
        if let Some(banners) = self.cache.get(ACTIVE_CACHE_KEY).await {
            return Ok(banners);
        }
        let generation = self.cache.generation();
        let banners = self.repo.list(Some(true)).await?;
        if !self
            .cache
            .insert_if_current(ACTIVE_CACHE_KEY, banners.clone(), generation)
            .await
        {
            debug!("Banners changed while loading, not caching");
        }
        Ok(banners)
    }

    pub async fn retrieve(&self, id: &str) -> Result<HeroBanner, HeroBannerError> {
        self.repo
            .read(id)
            .await?
            .ok_or_else(|| HeroBannerError::NotFound(id.to_string()))
    }

    pub async fn create(&self, input: CreateHeroBanner) -> Result<HeroBanner, HeroBannerError> {
        if input.image_url.trim().is_empty() {
            return Err(HeroBannerError::Validation("image_url is required".to_string()));
        }
        let sort_order = match input.sort_order {
            Some(order) => order,
            None => self.repo.max_sort_order().await?.map_or(0, |max| max + 1),
        };

        let now = Utc::now();
        let banner = self
            .repo
            .create(HeroBanner {
                id: generate_id("hb"),
                title: input.title,
                image_url: input.image_url,
                redirect_url: input.redirect_url.filter(|u| !u.is_empty()),
                is_active: input.is_active.unwrap_or(true),
                sort_order,
                created_at: now,
                updated_at: now,
            })
            .await?;
        self.invalidate().await;
        info!("Created hero banner {} at position {}", banner.id, banner.sort_order);
        Ok(banner)
    }

    pub async fn update(&self, id: &str, changes: UpdateHeroBanner) -> Result<HeroBanner, HeroBannerError> {
        let mut banner = self.retrieve(id).await?;
        changes.apply(&mut banner);
        banner.updated_at = Utc::now();

        let banner = self.repo.update(banner).await?;
        self.invalidate().await;
        Ok(banner)
    }

    /// Deleting an unknown id is not an error.
    pub async fn delete(&self, id: &str) -> Result<(), HeroBannerError> {
        if self.repo.delete(id).await? {
            info!("Deleted hero banner {}", id);
        }
        self.invalidate().await;
        Ok(())
    }

    pub async fn toggle_active(&self, id: &str, is_active: bool) -> Result<HeroBanner, HeroBannerError> {
        self.update(
            id,
            UpdateHeroBanner {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }

    /// Applies each `sort_order`, then returns the full admin list.
    pub async fn reorder(&self, orders: Vec<BannerOrder>) -> Result<Vec<HeroBanner>, HeroBannerError> {
        for order in orders {
            self.update(
                &order.id,
                UpdateHeroBanner {
                    sort_order: Some(order.sort_order),
                    ..Default::default()
                },
            )
            .await?;
        }
        self.list_admin(None).await
    }
}
