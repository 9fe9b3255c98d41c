//! PostgreSQL implementation of AdminRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use roster_core::entities::AdminUser;
use roster_core::error::DomainError;
use roster_core::traits::{AdminRepository, RepoResult};

use crate::mappers::admin_with_hash;
use crate::models::AdminUserModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of AdminRepository
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    /// Create a new PgAdminRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<AdminUser>> {
        let result = sqlx::query_as::<_, AdminUserModel>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM admin_users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(AdminUser::from))
    }

    #[instrument(skip(self))]
    async fn find_credentials(&self, email: &str) -> RepoResult<Option<(AdminUser, String)>> {
        let result = sqlx::query_as::<_, AdminUserModel>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM admin_users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(admin_with_hash))
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, email: &str, password_hash: &str) -> RepoResult<AdminUser> {
        let model = sqlx::query_as::<_, AdminUserModel>(
            r#"
            INSERT INTO admin_users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AdminEmailExists))?;

        Ok(AdminUser::from(model))
    }
}
