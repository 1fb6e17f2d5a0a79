//! Transaction entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transaction entity representing a financial record belonging to a user.
///
/// `value` is the amount in the currency the user reported; `value_converted`
/// is the same amount in the organization's currency. The transaction
/// currency stays free text, matching whatever the user wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub label: String,
    pub value: f64,
    pub currency: String,
    pub value_converted: f64,
    pub description: String,
}

/// Request for recording a new transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub label: String,
    pub value: f64,
    pub currency: String,
    pub value_converted: f64,
    pub description: String,
}
