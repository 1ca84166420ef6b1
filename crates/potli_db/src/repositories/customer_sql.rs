//! SQL implementation of the customer repository

use crate::error::DbError;
use crate::repositories::customer::{Customer, CustomerRepository};
use crate::repository::Repository;
use crate::row;
use crate::DbClient;
use sqlx::any::AnyRow;
use tracing::{debug, info};

const COLUMNS: &str =
    "id, email, first_name, last_name, has_account, metadata, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqlCustomerRepository {
    db_client: DbClient,
}

impl SqlCustomerRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn from_row(row: &AnyRow) -> Result<Customer, DbError> {
        Ok(Customer {
            id: row::string(row, "id")?,
            email: row::string(row, "email")?,
            first_name: row::opt_string(row, "first_name")?,
            last_name: row::opt_string(row, "last_name")?,
            has_account: row::flag(row, "has_account")?,
            metadata: row::json_map(row, "metadata")?,
            created_at: row::timestamp(row, "created_at")?,
            updated_at: row::timestamp(row, "updated_at")?,
        })
    }
}

impl Repository<Customer, DbError> for SqlCustomerRepository {
    async fn create(&self, customer: Customer) -> Result<Customer, DbError> {
        debug!("Creating customer {}", customer.id);

        let query = format!(
            "INSERT INTO customers ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        sqlx::query(&query)
            .bind(&customer.id)
            .bind(customer.email.to_lowercase())
            .bind(customer.first_name.clone())
            .bind(customer.last_name.clone())
            .bind(row::bool_int(customer.has_account))
            .bind(row::json_text(&customer.metadata)?)
            .bind(row::ts(&customer.created_at))
            .bind(row::ts(&customer.updated_at))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to insert customer", e))?;

        Ok(Customer {
            email: customer.email.to_lowercase(),
            ..customer
        })
    }

    async fn read(&self, id: &str) -> Result<Option<Customer>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to read customer", e))?;

        result.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, customer: Customer) -> Result<Customer, DbError> {
        debug!("Updating customer {}", customer.id);

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET email = $1, first_name = $2, last_name = $3, has_account = $4,
                metadata = $5, updated_at = $6
            WHERE id = $7
            "#,
        )
        .bind(customer.email.to_lowercase())
        .bind(customer.first_name.clone())
        .bind(customer.last_name.clone())
        .bind(row::bool_int(customer.has_account))
        .bind(row::json_text(&customer.metadata)?)
        .bind(row::ts(&customer.updated_at))
        .bind(&customer.id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| row::query_error("Failed to update customer", e))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("customer {}", customer.id)));
        }
        Ok(customer)
    }

    async fn delete(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to delete customer", e))?;

        Ok(result.rows_affected() > 0)
    }
}

impl CustomerRepository for SqlCustomerRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing customer schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS customers (
                    id TEXT PRIMARY KEY,
                    email TEXT NOT NULL UNIQUE,
                    first_name TEXT,
                    last_name TEXT,
                    has_account INTEGER NOT NULL DEFAULT 0,
                    metadata TEXT NOT NULL DEFAULT '{}',
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .await?;

        info!("Customer schema initialized");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE email = $1");
        let result = sqlx::query(&query)
            .bind(email.trim().to_lowercase())
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| row::query_error("Failed to find customer by email", e))?;

        result.as_ref().map(Self::from_row).transpose()
    }
}
