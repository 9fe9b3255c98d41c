//! Chat platform port
//!
//! Implemented by the Discord REST client. Role updates are read-modify-write
//! against Discord's copy of the member; there is no concurrency token, so a
//! concurrent external change can be overwritten.

use async_trait::async_trait;

use crate::entities::GuildMemberSnapshot;
use crate::traits::RepoResult;
use crate::value_objects::Snowflake;

#[async_trait]
pub trait GuildGateway: Send + Sync {
    /// List one page of guild members, ordered by user id, starting after `after`
    async fn list_members(
        &self,
        guild_id: Snowflake,
        limit: u16,
        after: Option<Snowflake>,
    ) -> RepoResult<Vec<GuildMemberSnapshot>>;

    /// Give `role_id` to the member; adding a held role is a no-op
    async fn add_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<GuildMemberSnapshot>;

    /// Take `role_id` from the member; removing a role not held is a no-op
    async fn remove_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<GuildMemberSnapshot>;

    /// Edit the message of a previously answered interaction
    async fn edit_interaction_response(
        &self,
        interaction_token: &str,
        content: &str,
    ) -> RepoResult<serde_json::Value>;
}
