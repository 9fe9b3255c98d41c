//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use tracing::{debug, instrument};

use roster_core::entities::{Member, MemberUpsert};
use roster_core::error::DomainError;
use roster_core::traits::{MemberRepository, RepoResult};
use roster_core::value_objects::Snowflake;

use crate::mappers::MemberWrite;
use crate::models::MemberModel;

use super::error::map_db_error;

const MEMBER_COLUMNS: &str =
    "id, discord_id, name, email, department, role, created_at, updated_at";

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert-or-update one row on any executor (pool or open transaction)
    async fn upsert_with<'e, E>(executor: E, member: &MemberUpsert) -> RepoResult<Member>
    where
        E: PgExecutor<'e>,
    {
        let write = MemberWrite::new(member);

        let model = sqlx::query_as::<_, MemberModel>(&format!(
            r#"
            INSERT INTO members (discord_id, name, email, department, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (discord_id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                department = EXCLUDED.department,
                role = EXCLUDED.role,
                updated_at = NOW()
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(write.discord_id)
        .bind(write.name)
        .bind(write.email)
        .bind(write.department)
        .bind(write.role)
        .fetch_one(executor)
        .await
        .map_err(map_db_error)?;

        Member::try_from(model)
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Member>> {
        let models = sqlx::query_as::<_, MemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(Member::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_discord_id(&self, discord_id: Snowflake) -> RepoResult<Option<Member>> {
        let result = sqlx::query_as::<_, MemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE discord_id = $1"
        ))
        .bind(discord_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Member::try_from).transpose()
    }

    #[instrument(skip(self, member), fields(discord_id = %member.discord_id))]
    async fn upsert(&self, member: &MemberUpsert) -> RepoResult<Member> {
        Self::upsert_with(&self.pool, member).await
    }

    #[instrument(skip(self, members), fields(count = members.len()))]
    async fn upsert_many(&self, members: &[MemberUpsert]) -> RepoResult<Vec<Member>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let mut stored = Vec::with_capacity(members.len());
        for member in members {
            // Dropping `tx` on error rolls the batch back
            stored.push(Self::upsert_with(&mut *tx, member).await?);
        }

        tx.commit().await.map_err(map_db_error)?;
        debug!(count = stored.len(), "Member batch committed");

        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn delete_by_discord_id(&self, discord_id: Snowflake) -> RepoResult<Member> {
        let result = sqlx::query_as::<_, MemberModel>(&format!(
            "DELETE FROM members WHERE discord_id = $1 RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(discord_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match result {
            Some(model) => Member::try_from(model),
            None => Err(DomainError::MemberNotFound(discord_id)),
        }
    }
}
