//! Transaction repository for database operations.

use crate::entities::{CreateTransactionRequest, Organization, Transaction};
use crate::types::{TransactionError, TransactionResult};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use tracing::info;

use super::parse_timestamp;

/// Repository for transaction database operations
#[derive(Clone)]
pub struct TransactionRepository {
    pool: AnyPool,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Record a transaction
    pub async fn record(&self, request: &CreateTransactionRequest) -> TransactionResult<()> {
        info!(
            label = %request.label,
            value = request.value,
            currency = %request.currency,
            "creating new transaction record"
        );

        sqlx::query(
            "INSERT INTO transactions (user_id, created_at, label, value, currency, value_converted, description)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.user_id)
        .bind(request.created_at.to_rfc3339())
        .bind(&request.label)
        .bind(request.value)
        .bind(&request.currency)
        .bind(request.value_converted)
        .bind(&request.description)
        .execute(&self.pool)
        .await
        .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        info!("successfully recorded transaction");
        Ok(())
    }

    /// Retrieve the organization's transactions recorded at or after
    /// January 1st of the given date's year, in store-default order
    pub async fn find_for_organization_year(
        &self,
        date: DateTime<Utc>,
        organization: &Organization,
    ) -> TransactionResult<Vec<Transaction>> {
        let year_start = Utc
            .with_ymd_and_hms(date.year(), 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| {
                TransactionError::DatabaseError(format!("invalid year start for {date}"))
            })?;

        let rows = sqlx::query(
            "SELECT t.id, t.user_id, t.created_at, t.label, t.value, t.currency, t.value_converted, t.description
             FROM transactions t
             INNER JOIN users u ON t.user_id = u.id
             WHERE t.created_at >= ? AND u.organization_id = ?",
        )
        .bind(year_start.to_rfc3339())
        .bind(organization.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        let transactions = rows
            .iter()
            .map(transaction_from_row)
            .collect::<TransactionResult<Vec<_>>>()?;

        info!(
            count = transactions.len(),
            organization_id = organization.id,
            "successfully retrieved transactions"
        );

        Ok(transactions)
    }
}

fn transaction_from_row(row: &AnyRow) -> TransactionResult<Transaction> {
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

    Ok(Transaction {
        id: row
            .try_get("id")
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?,
        user_id: row
            .try_get("user_id")
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?,
        created_at: parse_timestamp(&created_at)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?,
        label: row
            .try_get("label")
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?,
        value: row
            .try_get("value")
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?,
        currency: row
            .try_get("currency")
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?,
        value_converted: row
            .try_get("value_converted")
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?,
    })
}
