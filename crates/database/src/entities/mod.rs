//! Entity definitions for the persistence layer

pub mod organization;
pub mod transaction;
pub mod user;

pub use organization::{CreateOrganizationRequest, Currency, Language, Organization};
pub use transaction::{CreateTransactionRequest, Transaction};
pub use user::{CreateUserRequest, User};
