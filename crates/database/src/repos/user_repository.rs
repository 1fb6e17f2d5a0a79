//! User repository for database operations.

use crate::entities::{CreateUserRequest, Currency, Language, Organization, User};
use crate::types::{UserError, UserResult};
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use tracing::{info, warn};

use super::parse_timestamp;

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: AnyPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Record a new user
    pub async fn create(&self, request: &CreateUserRequest) -> UserResult<()> {
        info!(whatsapp_phone = %request.whatsapp_phone, "creating new user record");

        sqlx::query(
            "INSERT INTO users (organization_id, created_at, whatsapp_phone, name, is_admin)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(request.organization_id)
        .bind(request.created_at.to_rfc3339())
        .bind(&request.whatsapp_phone)
        .bind(&request.name)
        .bind(i64::from(request.is_admin))
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        info!("successfully recorded user");
        Ok(())
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, organization_id, created_at, whatsapp_phone, name, is_admin
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Find the user with the given WhatsApp phone
    pub async fn find_by_phone(&self, whatsapp_phone: &str) -> UserResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, organization_id, created_at, whatsapp_phone, name, is_admin
             FROM users WHERE whatsapp_phone = ?",
        )
        .bind(whatsapp_phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Retrieve the user with the given WhatsApp phone together with their
    /// organization.
    ///
    /// A phone matching no user resolves to `None`; a phone matching more
    /// than one user is reported as `DuplicatePhone` rather than collapsed
    /// into not-found.
    pub async fn find_with_organization(
        &self,
        whatsapp_phone: &str,
    ) -> UserResult<Option<(User, Organization)>> {
        let rows = sqlx::query(
            "SELECT u.id AS user_id, u.organization_id, u.created_at AS user_created_at,
                    u.whatsapp_phone, u.name AS user_name, u.is_admin,
                    o.id AS org_id, o.created_at AS org_created_at, o.name AS org_name,
                    o.currency, o.language
             FROM users u
             INNER JOIN organizations o ON u.organization_id = o.id
             WHERE u.whatsapp_phone = ?",
        )
        .bind(whatsapp_phone)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if rows.len() > 1 {
            warn!(whatsapp_phone, "multiple users share whatsapp phone");
            return Err(UserError::DuplicatePhone);
        }

        let Some(row) = rows.into_iter().next() else {
            warn!(whatsapp_phone, "no user and organization found for whatsapp phone");
            return Ok(None);
        };

        let user_created_at: String = row
            .try_get("user_created_at")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let org_created_at: String = row
            .try_get("org_created_at")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let is_admin: i64 = row
            .try_get("is_admin")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let currency: String = row
            .try_get("currency")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let language: String = row
            .try_get("language")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let user = User {
            id: row
                .try_get("user_id")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            organization_id: row
                .try_get("organization_id")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            created_at: parse_timestamp(&user_created_at)
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            whatsapp_phone: row
                .try_get("whatsapp_phone")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            name: row
                .try_get("user_name")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            is_admin: is_admin != 0,
        };

        let organization = Organization {
            id: row
                .try_get("org_id")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            created_at: parse_timestamp(&org_created_at)
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            name: row
                .try_get("org_name")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            currency: Currency::from(currency.as_str()),
            language: Language::from(language.as_str()),
        };

        info!(whatsapp_phone, "successfully retrieved user and organization");

        Ok(Some((user, organization)))
    }

    /// Update a user's display name and return the refreshed record
    pub async fn update_name(&self, user: &User, name: &str) -> UserResult<User> {
        let current = self
            .find_by_id(user.id)
            .await?
            .ok_or(UserError::UserNotFound)?;

        sqlx::query("UPDATE users SET name = ? WHERE id = ?")
            .bind(name)
            .bind(current.id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        info!(user_id = current.id, "successfully updated user");

        self.find_by_id(current.id)
            .await?
            .ok_or(UserError::UserNotFound)
    }
}

fn user_from_row(row: &AnyRow) -> UserResult<User> {
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    let is_admin: i64 = row
        .try_get("is_admin")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

    Ok(User {
        id: row
            .try_get("id")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        organization_id: row
            .try_get("organization_id")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        created_at: parse_timestamp(&created_at)
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        whatsapp_phone: row
            .try_get("whatsapp_phone")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        is_admin: is_admin != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::prepare_database;
    use crate::entities::CreateOrganizationRequest;
    use crate::migrations::run_migrations;
    use crate::repos::OrganizationRepository;
    use chrono::{TimeZone, Utc};
    use contabot_config::DatabaseConfig;
    use tempfile::TempDir;

    async fn create_test_pool() -> (AnyPool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let config = DatabaseConfig {
            url: Some(db_url.clone()),
            max_connections: 1,
            ..DatabaseConfig::default()
        };

        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool, &db_url).await.unwrap();
        (pool, temp_dir)
    }

    async fn seed_organization(pool: &AnyPool, name: &str) -> i64 {
        let repo = OrganizationRepository::new(pool.clone());
        repo.create(&CreateOrganizationRequest {
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 7, 0, 0).unwrap(),
            name: name.to_string(),
            language: Language::Es,
            currency: Currency::Cop,
        })
        .await
        .unwrap()
    }

    fn user_request(organization_id: Option<i64>, phone: &str) -> CreateUserRequest {
        CreateUserRequest {
            organization_id,
            created_at: Utc.with_ymd_and_hms(2024, 1, 11, 15, 45, 0).unwrap(),
            whatsapp_phone: phone.to_string(),
            name: "Andrés".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_phone() {
        let (pool, _temp_dir) = create_test_pool().await;
        let organization_id = seed_organization(&pool, "Tienda La Esquina").await;
        let repo = UserRepository::new(pool);

        let request = user_request(Some(organization_id), "+573001112233");
        repo.create(&request).await.unwrap();

        let user = repo.find_by_phone("+573001112233").await.unwrap().unwrap();
        assert_eq!(user.organization_id, Some(organization_id));
        assert_eq!(user.whatsapp_phone, request.whatsapp_phone);
        assert_eq!(user.name, request.name);
        assert_eq!(user.created_at, request.created_at);
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_find_by_phone_returns_none_for_unknown_phone() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        assert!(repo.find_by_phone("+9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_without_organization() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        repo.create(&user_request(None, "+573005556677"))
            .await
            .unwrap();

        let user = repo.find_by_phone("+573005556677").await.unwrap().unwrap();
        assert_eq!(user.organization_id, None);
    }

    #[tokio::test]
    async fn test_find_with_organization_returns_the_pair() {
        let (pool, _temp_dir) = create_test_pool().await;
        let organization_id = seed_organization(&pool, "Tienda La Esquina").await;
        let repo = UserRepository::new(pool);

        repo.create(&user_request(Some(organization_id), "+1555"))
            .await
            .unwrap();

        let (user, organization) = repo
            .find_with_organization("+1555")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.whatsapp_phone, "+1555");
        assert_eq!(user.organization_id, Some(organization.id));
        assert_eq!(organization.id, organization_id);
        assert_eq!(organization.name, "Tienda La Esquina");
        assert_eq!(organization.currency, Currency::Cop);
        assert_eq!(organization.language, Language::Es);
    }

    #[tokio::test]
    async fn test_find_with_organization_returns_none_for_unknown_phone() {
        let (pool, _temp_dir) = create_test_pool().await;
        let organization_id = seed_organization(&pool, "Tienda La Esquina").await;
        let repo = UserRepository::new(pool);

        repo.create(&user_request(Some(organization_id), "+1555"))
            .await
            .unwrap();

        assert!(repo
            .find_with_organization("+9999")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_with_organization_rejects_duplicate_phones() {
        let (pool, _temp_dir) = create_test_pool().await;
        let organization_id = seed_organization(&pool, "Tienda La Esquina").await;
        let repo = UserRepository::new(pool);

        repo.create(&user_request(Some(organization_id), "+1555"))
            .await
            .unwrap();
        repo.create(&user_request(Some(organization_id), "+1555"))
            .await
            .unwrap();

        let error = repo.find_with_organization("+1555").await.unwrap_err();
        assert!(matches!(error, UserError::DuplicatePhone));
    }

    #[tokio::test]
    async fn test_update_name_changes_only_the_name() {
        let (pool, _temp_dir) = create_test_pool().await;
        let organization_id = seed_organization(&pool, "Tienda La Esquina").await;
        let repo = UserRepository::new(pool);

        repo.create(&user_request(Some(organization_id), "+573001112233"))
            .await
            .unwrap();
        let before = repo.find_by_phone("+573001112233").await.unwrap().unwrap();

        let updated = repo.update_name(&before, "Andrés Felipe").await.unwrap();
        assert_eq!(updated.name, "Andrés Felipe");
        assert_eq!(updated.id, before.id);
        assert_eq!(updated.organization_id, before.organization_id);
        assert_eq!(updated.created_at, before.created_at);
        assert_eq!(updated.whatsapp_phone, before.whatsapp_phone);
        assert_eq!(updated.is_admin, before.is_admin);

        let refetched = repo.find_by_phone("+573001112233").await.unwrap().unwrap();
        assert_eq!(refetched.name, "Andrés Felipe");
    }

    #[tokio::test]
    async fn test_update_name_fails_for_missing_user() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        let ghost = User {
            id: 404,
            organization_id: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            whatsapp_phone: "+0000".to_string(),
            name: "Ghost".to_string(),
            is_admin: false,
        };

        let error = repo.update_name(&ghost, "Still Ghost").await.unwrap_err();
        assert!(matches!(error, UserError::UserNotFound));
    }
}
