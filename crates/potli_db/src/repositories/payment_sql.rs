//! SQL implementation of the payment repository

use crate::error::DbError;
use crate::repositories::payment::{PaymentCollection, PaymentRepository, PaymentSession};
use crate::row;
use crate::DbClient;
use potli_common::models::PaymentSessionStatus;
use sqlx::any::AnyRow;
use tracing::{debug, info};

const COLLECTION_COLUMNS: &str =
    "id, cart_id, region_id, currency_code, amount, status, created_at, updated_at";
const SESSION_COLUMNS: &str = "id, payment_collection_id, provider_id, amount, currency_code, \
     status, data, authorized_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqlPaymentRepository {
    db_client: DbClient,
}

impl SqlPaymentRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn collection_from_row(row: &AnyRow) -> Result<PaymentCollection, DbError> {
        Ok(PaymentCollection {
            id: row::string(row, "id")?,
            cart_id: row::string(row, "cart_id")?,
            region_id: row::opt_string(row, "region_id")?,
            currency_code: row::string(row, "currency_code")?,
            amount: row::int(row, "amount")?,
            status: row::string(row, "status")?,
            created_at: row::timestamp(row, "created_at")?,
            updated_at: row::timestamp(row, "updated_at")?,
        })
    }

    fn session_from_row(row: &AnyRow) -> Result<PaymentSession, DbError> {
        Ok(PaymentSession {
            id: row::string(row, "id")?,
            payment_collection_id: row::string(row, "payment_collection_id")?,
            provider_id: row::string(row, "provider_id")?,
            amount: row::int(row, "amount")?,
            currency_code: row::string(row, "currency_code")?,
            status: PaymentSessionStatus::parse(&row::string(row, "status")?),
            data: row::json_map(row, "data")?,
            authorized_at: row::opt_timestamp(row, "authorized_at")?,
            created_at: row::timestamp(row, "created_at")?,
            updated_at: row::timestamp(row, "updated_at")?,
        })
    }
}

impl PaymentRepository for SqlPaymentRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing payment schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS payment_collections (
                    id TEXT PRIMARY KEY,
                    cart_id TEXT NOT NULL UNIQUE,
                    region_id TEXT,
                    currency_code TEXT NOT NULL,
                    amount BIGINT NOT NULL,
                    status TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS payment_sessions (
                    id TEXT PRIMARY KEY,
                    payment_collection_id TEXT NOT NULL REFERENCES payment_collections(id),
                    provider_id TEXT NOT NULL,
                    amount BIGINT NOT NULL,
                    currency_code TEXT NOT NULL,
                    status TEXT NOT NULL,
                    data TEXT NOT NULL DEFAULT '{}',
                    authorized_at TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        info!("Payment schema initialized");
        Ok(())
    }

    async fn create_collection(
        &self,
        collection: PaymentCollection,
    ) -> Result<PaymentCollection, DbError> {
        debug!("Creating payment collection for cart {}", collection.cart_id);

        let query = format!(
            "INSERT INTO payment_collections ({COLLECTION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        sqlx::query(&query)
            .bind(&collection.id)
            .bind(&collection.cart_id)
            .bind(collection.region_id.clone())
            .bind(&collection.currency_code)
            .bind(collection.amount)
            .bind(&collection.status)
            .bind(row::ts(&collection.created_at))
            .bind(row::ts(&collection.updated_at))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to insert payment collection", e))?;

        Ok(collection)
    }

    async fn find_collection(&self, id: &str) -> Result<Option<PaymentCollection>, DbError> {
        let query = format!("SELECT {COLLECTION_COLUMNS} FROM payment_collections WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to read payment collection", e))?;

        result.as_ref().map(Self::collection_from_row).transpose()
    }

    async fn find_collection_by_cart(
        &self,
        cart_id: &str,
    ) -> Result<Option<PaymentCollection>, DbError> {
        let query =
            format!("SELECT {COLLECTION_COLUMNS} FROM payment_collections WHERE cart_id = $1");
        let result = sqlx::query(&query)
            .bind(cart_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to find payment collection", e))?;

        result.as_ref().map(Self::collection_from_row).transpose()
    }

    async fn update_collection(
        &self,
        collection: PaymentCollection,
    ) -> Result<PaymentCollection, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE payment_collections
            SET region_id = $1, currency_code = $2, amount = $3, status = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(collection.region_id.clone())
        .bind(&collection.currency_code)
        .bind(collection.amount)
        .bind(&collection.status)
        .bind(row::ts(&collection.updated_at))
        .bind(&collection.id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| row::query_error("Failed to update payment collection", e))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("payment collection {}", collection.id)));
        }
        Ok(collection)
    }

    async fn create_session(&self, session: PaymentSession) -> Result<PaymentSession, DbError> {
        debug!(
            "Creating payment session {} ({}) in collection {}",
            session.id, session.provider_id, session.payment_collection_id
        );

        let query = format!(
            "INSERT INTO payment_sessions ({SESSION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        sqlx::query(&query)
            .bind(&session.id)
            .bind(&session.payment_collection_id)
            .bind(&session.provider_id)
            .bind(session.amount)
            .bind(&session.currency_code)
            .bind(session.status.as_str())
            .bind(row::json_text(&session.data)?)
            .bind(session.authorized_at.as_ref().map(row::ts))
            .bind(row::ts(&session.created_at))
            .bind(row::ts(&session.updated_at))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to insert payment session", e))?;

        Ok(session)
    }

    async fn find_session(&self, id: &str) -> Result<Option<PaymentSession>, DbError> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM payment_sessions WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to read payment session", e))?;

        result.as_ref().map(Self::session_from_row).transpose()
    }

    async fn list_sessions(&self, payment_collection_id: &str) -> Result<Vec<PaymentSession>, DbError> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM payment_sessions \
             WHERE payment_collection_id = $1 ORDER BY created_at ASC"
        );
        let rows = sqlx::query(&query)
            .bind(payment_collection_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to list payment sessions", e))?;

        rows.iter().map(Self::session_from_row).collect()
    }

    async fn update_session(&self, session: PaymentSession) -> Result<PaymentSession, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE payment_sessions
            SET amount = $1, status = $2, data = $3, authorized_at = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(session.amount)
        .bind(session.status.as_str())
        .bind(row::json_text(&session.data)?)
        .bind(session.authorized_at.as_ref().map(row::ts))
        .bind(row::ts(&session.updated_at))
        .bind(&session.id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| row::query_error("Failed to update payment session", e))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("payment session {}", session.id)));
        }
        Ok(session)
    }
}
