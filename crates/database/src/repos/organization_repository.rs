//! Organization repository for database operations.

use crate::entities::{CreateOrganizationRequest, Currency, Language, Organization, User};
use crate::types::{OrganizationError, OrganizationResult};
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use tracing::info;

use super::parse_timestamp;

/// Repository for organization database operations
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: AnyPool,
}

impl OrganizationRepository {
    /// Create a new organization repository
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Insert a new organization and return its generated id
    pub async fn create(&self, request: &CreateOrganizationRequest) -> OrganizationResult<i64> {
        info!(name = %request.name, "creating new organization record");

        let result = sqlx::query(
            "INSERT INTO organizations (created_at, name, currency, language) VALUES (?, ?, ?, ?)",
        )
        .bind(request.created_at.to_rfc3339())
        .bind(&request.name)
        .bind(request.currency.as_str())
        .bind(request.language.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| OrganizationError::DatabaseError(e.to_string()))?;

        let organization_id = result.last_insert_id().ok_or_else(|| {
            OrganizationError::DatabaseError("driver returned no generated id".to_string())
        })?;

        info!(organization_id, "successfully recorded organization");

        Ok(organization_id)
    }

    /// Find organization by ID
    pub async fn find_by_id(&self, id: i64) -> OrganizationResult<Option<Organization>> {
        let row = sqlx::query(
            "SELECT id, created_at, name, currency, language FROM organizations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| OrganizationError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(organization_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Retrieve the organization the given user belongs to.
    ///
    /// Exactly one match is assumed; a user without a stored organization is
    /// an error here, not an absent result.
    pub async fn find_for_user(&self, user: &User) -> OrganizationResult<Organization> {
        let row = sqlx::query(
            "SELECT id, created_at, name, currency, language FROM organizations WHERE id = ?",
        )
        .bind(user.organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| OrganizationError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => organization_from_row(&row),
            None => Err(OrganizationError::OrganizationNotFound),
        }
    }
}

fn organization_from_row(row: &AnyRow) -> OrganizationResult<Organization> {
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| OrganizationError::DatabaseError(e.to_string()))?;
    let currency: String = row
        .try_get("currency")
        .map_err(|e| OrganizationError::DatabaseError(e.to_string()))?;
    let language: String = row
        .try_get("language")
        .map_err(|e| OrganizationError::DatabaseError(e.to_string()))?;

    Ok(Organization {
        id: row
            .try_get("id")
            .map_err(|e| OrganizationError::DatabaseError(e.to_string()))?,
        created_at: parse_timestamp(&created_at)
            .map_err(|e| OrganizationError::DatabaseError(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| OrganizationError::DatabaseError(e.to_string()))?,
        currency: Currency::from(currency.as_str()),
        language: Language::from(language.as_str()),
    })
}
