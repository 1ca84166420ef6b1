//! SQL implementation of the invite repository

use crate::error::DbError;
use crate::repositories::invite::{Invite, InviteRepository};
use crate::repository::Repository;
use crate::row;
use crate::DbClient;
use chrono::{DateTime, Utc};
use sqlx::any::AnyRow;
use tracing::{debug, info};

const COLUMNS: &str = "id, email, token, accepted, expires_at, metadata, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqlInviteRepository {
    db_client: DbClient,
}

impl SqlInviteRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn from_row(row: &AnyRow) -> Result<Invite, DbError> {
        Ok(Invite {
            id: row::string(row, "id")?,
            email: row::string(row, "email")?,
            token: row::string(row, "token")?,
            accepted: row::flag(row, "accepted")?,
            expires_at: row::timestamp(row, "expires_at")?,
            metadata: row::json_map(row, "metadata")?,
            created_at: row::timestamp(row, "created_at")?,
            updated_at: row::timestamp(row, "updated_at")?,
        })
    }
}

impl Repository<Invite, DbError> for SqlInviteRepository {
    async fn create(&self, invite: Invite) -> Result<Invite, DbError> {
        debug!("Creating invite {} for {}", invite.id, invite.email);

        let query = format!(
            "INSERT INTO invites ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        sqlx::query(&query)
            .bind(&invite.id)
            .bind(invite.email.to_lowercase())
            .bind(&invite.token)
            .bind(row::bool_int(invite.accepted))
            .bind(row::ts(&invite.expires_at))
            .bind(row::json_text(&invite.metadata)?)
            .bind(row::ts(&invite.created_at))
            .bind(row::ts(&invite.updated_at))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to insert invite", e))?;

        Ok(Invite {
            email: invite.email.to_lowercase(),
            ..invite
        })
    }

    async fn read(&self, id: &str) -> Result<Option<Invite>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM invites WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to read invite", e))?;

        result.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, invite: Invite) -> Result<Invite, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE invites
            SET token = $1, accepted = $2, expires_at = $3, metadata = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&invite.token)
        .bind(row::bool_int(invite.accepted))
        .bind(row::ts(&invite.expires_at))
        .bind(row::json_text(&invite.metadata)?)
        .bind(row::ts(&invite.updated_at))
        .bind(&invite.id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| row::query_error("Failed to update invite", e))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("invite {}", invite.id)));
        }
        Ok(invite)
    }

    async fn delete(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM invites WHERE id = $1")
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to delete invite", e))?;

        Ok(result.rows_affected() > 0)
    }
}

impl InviteRepository for SqlInviteRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing invite schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS invites (
                    id TEXT PRIMARY KEY,
                    email TEXT NOT NULL,
                    token TEXT NOT NULL UNIQUE,
                    accepted INTEGER NOT NULL DEFAULT 0,
                    expires_at TEXT NOT NULL,
                    metadata TEXT NOT NULL DEFAULT '{}',
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        info!("Invite schema initialized");
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM invites WHERE token = $1");
        let result = sqlx::query(&query)
            .bind(token)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to find invite by token", e))?;

        result.as_ref().map(Self::from_row).transpose()
    }

    async fn mark_accepted(&self, id: &str, at: DateTime<Utc>) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE invites SET accepted = 1, updated_at = $1 WHERE id = $2 AND accepted = 0")
            .bind(row::ts(&at))
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to accept invite", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list(&self) -> Result<Vec<Invite>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM invites ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to list invites", e))?;

        rows.iter().map(Self::from_row).collect()
    }
}
