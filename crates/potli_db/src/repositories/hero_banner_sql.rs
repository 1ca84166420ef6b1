//! SQL implementation of the hero banner repository

use crate::error::DbError;
use crate::repositories::hero_banner::{HeroBanner, HeroBannerRepository};
use crate::repository::Repository;
use crate::row;
use crate::DbClient;
use sqlx::any::AnyRow;
use tracing::{debug, info};

const COLUMNS: &str =
    "id, title, image_url, redirect_url, is_active, sort_order, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqlHeroBannerRepository {
    db_client: DbClient,
}

impl SqlHeroBannerRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn from_row(row: &AnyRow) -> Result<HeroBanner, DbError> {
        Ok(HeroBanner {
            id: row::string(row, "id")?,
            title: row::opt_string(row, "title")?,
            image_url: row::string(row, "image_url")?,
            redirect_url: row::opt_string(row, "redirect_url")?,
            is_active: row::flag(row, "is_active")?,
            sort_order: row::int(row, "sort_order")?,
            created_at: row::timestamp(row, "created_at")?,
            updated_at: row::timestamp(row, "updated_at")?,
        })
    }
}

impl Repository<HeroBanner, DbError> for SqlHeroBannerRepository {
    async fn create(&self, banner: HeroBanner) -> Result<HeroBanner, DbError> {
        debug!("Creating hero banner {}", banner.id);

        let query = format!(
            "INSERT INTO hero_banners ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        sqlx::query(&query)
            .bind(&banner.id)
            .bind(banner.title.clone())
            .bind(&banner.image_url)
            .bind(banner.redirect_url.clone())
            .bind(row::bool_int(banner.is_active))
            .bind(banner.sort_order)
            .bind(row::ts(&banner.created_at))
            .bind(row::ts(&banner.updated_at))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to insert hero banner", e))?;

        Ok(banner)
    }

    async fn read(&self, id: &str) -> Result<Option<HeroBanner>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM hero_banners WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to read hero banner", e))?;

        result.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, banner: HeroBanner) -> Result<HeroBanner, DbError> {
        debug!("Updating hero banner {}", banner.id);

        let result = sqlx::query(
            r#"
            UPDATE hero_banners
            SET title = $1, image_url = $2, redirect_url = $3, is_active = $4,
                sort_order = $5, updated_at = $6
            WHERE id = $7
            "#,
        )
        .bind(banner.title.clone())
        .bind(&banner.image_url)
        .bind(banner.redirect_url.clone())
        .bind(row::bool_int(banner.is_active))
        .bind(banner.sort_order)
        .bind(row::ts(&banner.updated_at))
        .bind(&banner.id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| row::query_error("Failed to update hero banner", e))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("hero banner {}", banner.id)));
        }
        Ok(banner)
    }

    async fn delete(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM hero_banners WHERE id = $1")
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to delete hero banner", e))?;

        Ok(result.rows_affected() > 0)
    }
}

impl HeroBannerRepository for SqlHeroBannerRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing hero banner schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS hero_banners (
                    id TEXT PRIMARY KEY,
                    title TEXT,
                    image_url TEXT NOT NULL,
                    redirect_url TEXT,
                    is_active INTEGER NOT NULL DEFAULT 1,
                    sort_order BIGINT NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        info!("Hero banner schema initialized");
        Ok(())
    }

    async fn list(&self, is_active: Option<bool>) -> Result<Vec<HeroBanner>, DbError> {
        let rows = match is_active {
            Some(active) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM hero_banners WHERE is_active = $1 \
                     ORDER BY sort_order ASC, created_at ASC"
                );
                sqlx::query(&query)
                    .bind(row::bool_int(active))
                    .fetch_all(self.db_client.pool())
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM hero_banners ORDER BY sort_order ASC, created_at ASC"
                );
                sqlx::query(&query).fetch_all(self.db_client.pool()).await
            }
        }
        .map_err(|e| row::query_error("Failed to list hero banners", e))?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn max_sort_order(&self) -> Result<Option<i64>, DbError> {
        let rows = sqlx::query("SELECT sort_order FROM hero_banners ORDER BY sort_order DESC LIMIT 1")
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to read max sort order", e))?;

        rows.first().map(|r| row::int(r, "sort_order")).transpose()
    }
}
