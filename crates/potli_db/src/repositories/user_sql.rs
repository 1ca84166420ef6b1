//! SQL implementation of the admin user repository

use crate::error::DbError;
use crate::repositories::user::{AdminUser, UserRepository};
use crate::repository::Repository;
use crate::row;
use crate::DbClient;
use sqlx::any::AnyRow;
use tracing::{debug, info};

const COLUMNS: &str = "id, email, first_name, last_name, metadata, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqlUserRepository {
    db_client: DbClient,
}

impl SqlUserRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn from_row(row: &AnyRow) -> Result<AdminUser, DbError> {
        Ok(AdminUser {
            id: row::string(row, "id")?,
            email: row::string(row, "email")?,
            first_name: row::opt_string(row, "first_name")?,
            last_name: row::opt_string(row, "last_name")?,
            metadata: row::json_map(row, "metadata")?,
            created_at: row::timestamp(row, "created_at")?,
            updated_at: row::timestamp(row, "updated_at")?,
        })
    }
}

impl Repository<AdminUser, DbError> for SqlUserRepository {
    async fn create(&self, user: AdminUser) -> Result<AdminUser, DbError> {
        debug!("Creating admin user {}", user.id);

        let query = format!("INSERT INTO users ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)");
        let user = AdminUser {
            email: user.email.to_lowercase(),
            ..user
        };
        sqlx::query(&query)
            .bind(&user.id)
            .bind(&user.email)
            .bind(user.first_name.clone())
            .bind(user.last_name.clone())
            .bind(row::json_text(&user.metadata)?)
            .bind(row::ts(&user.created_at))
            .bind(row::ts(&user.updated_at))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to insert admin user", e))?;

        Ok(user)
    }

    async fn read(&self, id: &str) -> Result<Option<AdminUser>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to read admin user", e))?;

        result.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, user: AdminUser) -> Result<AdminUser, DbError> {
        debug!("Updating admin user {}", user.id);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $1, last_name = $2, metadata = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(user.first_name.clone())
        .bind(user.last_name.clone())
        .bind(row::json_text(&user.metadata)?)
        .bind(row::ts(&user.updated_at))
        .bind(&user.id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| row::query_error("Failed to update admin user", e))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("user {}", user.id)));
        }
        Ok(user)
    }

    async fn delete(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to delete admin user", e))?;

        Ok(result.rows_affected() > 0)
    }
}

impl UserRepository for SqlUserRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing admin user schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    email TEXT NOT NULL UNIQUE,
                    first_name TEXT,
                    last_name TEXT,
                    metadata TEXT NOT NULL DEFAULT '{}',
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        info!("Admin user schema initialized");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let result = sqlx::query(&query)
            .bind(email.trim().to_lowercase())
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to find admin user by email", e))?;

        result.as_ref().map(Self::from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<AdminUser>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at ASC");
        let rows = sqlx::query(&query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to list admin users", e))?;

        rows.iter().map(Self::from_row).collect()
    }
}
