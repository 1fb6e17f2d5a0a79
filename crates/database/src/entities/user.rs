//! User entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a person belonging to an organization,
/// identified by their WhatsApp phone number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub organization_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub whatsapp_phone: String,
    pub name: String,
    pub is_admin: bool,
}

/// Request for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub organization_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub whatsapp_phone: String,
    pub name: String,
    pub is_admin: bool,
}
