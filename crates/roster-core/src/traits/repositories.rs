//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{AdminUser, Member, MemberUpsert};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository and gateway operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// List every member, ordered by store id
    async fn list(&self) -> RepoResult<Vec<Member>>;

    /// Find member by Discord user id
    async fn find_by_discord_id(&self, discord_id: Snowflake) -> RepoResult<Option<Member>>;

    /// Insert the member, or update the row with the same `discord_id`
    async fn upsert(&self, member: &MemberUpsert) -> RepoResult<Member>;

    /// Upsert a batch atomically: either every row is written or none is
    async fn upsert_many(&self, members: &[MemberUpsert]) -> RepoResult<Vec<Member>>;

    /// Delete by Discord user id, returning the removed row
    ///
    /// Fails with `MemberNotFound` when no row matches.
    async fn delete_by_discord_id(&self, discord_id: Snowflake) -> RepoResult<Member>;
}

// ============================================================================
// Admin Repository
// ============================================================================

#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Find admin by id
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<AdminUser>>;

    /// Find admin and password hash by email (case-insensitive)
    async fn find_credentials(&self, email: &str) -> RepoResult<Option<(AdminUser, String)>>;

    /// Create a new admin
    async fn create(&self, email: &str, password_hash: &str) -> RepoResult<AdminUser>;
}
