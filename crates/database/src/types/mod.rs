//! Shared types and result types for the database layer

pub mod errors;

// Re-export common types
pub use errors::{DatabaseError, OrganizationError, TransactionError, UserError};

// Common result types
pub type DatabaseResult<T> = Result<T, DatabaseError>;
pub type OrganizationResult<T> = Result<T, OrganizationError>;
pub type UserResult<T> = Result<T, UserError>;
pub type TransactionResult<T> = Result<T, TransactionError>;

// Re-export request types from entities
pub use crate::entities::{
    CreateOrganizationRequest, CreateTransactionRequest, CreateUserRequest,
};
