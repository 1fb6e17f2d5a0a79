//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Database query error: {0}")]
    QueryError(String),
}

/// Organization-specific database errors
#[derive(Debug, Error)]
pub enum OrganizationError {
    #[error("Organization not found")]
    OrganizationNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// User-specific database errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("Multiple users share the same WhatsApp phone")]
    DuplicatePhone,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Transaction-specific database errors
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
