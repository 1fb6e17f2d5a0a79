//! Database repository implementations

pub mod organization_repository;
pub mod transaction_repository;
pub mod user_repository;

// Re-export all repositories for convenience
pub use organization_repository::*;
pub use transaction_repository::*;
pub use user_repository::*;

use chrono::{DateTime, Utc};

// Timestamps are stored as RFC 3339 text so both backends compare and
// decode them the same way.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.with_timezone(&Utc))
}
