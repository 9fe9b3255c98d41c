//! In-memory fakes for the repository and gateway ports
//!
//! Used by this crate's unit tests and, through the `test-util` feature, by
//! the API crate's router tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use roster_common::auth::{JwtService, SharedSecret};
use roster_core::traits::{AdminRepository, GuildGateway, MemberRepository, RepoResult};
use roster_core::{
    AdminUser, DepartmentRoleMap, DomainError, GuildMemberSnapshot, Member, MemberUpsert, OrgRole,
    Snowflake,
};
use tokio::sync::Mutex;

use crate::services::{ServiceContext, ServiceContextBuilder, SyncSettings};

pub const GUILD_ID: Snowflake = Snowflake::new(1_000_000_000_000_000_001);
pub const TECHNICAL_ROLE: Snowflake = Snowflake::new(1_292_540_786_759_700_623);
pub const DESIGN_ROLE: Snowflake = Snowflake::new(1_292_540_869_433_491_466);
pub const MARKETING_ROLE: Snowflake = Snowflake::new(1_292_540_932_054_585_384);
pub const MANAGEMENT_ROLE: Snowflake = Snowflake::new(1_292_540_937_653_715_088);
pub const SYNC_KEY: &str = "test-sync-key";
pub const JWT_SECRET: &str = "test-jwt-secret";

/// Role mapping used by the fakes
pub fn test_role_map() -> DepartmentRoleMap {
    DepartmentRoleMap::new(TECHNICAL_ROLE, DESIGN_ROLE, MARKETING_ROLE, MANAGEMENT_ROLE)
        .unwrap_or_else(|e| panic!("test role map: {e}"))
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Default)]
struct MemberTable {
    rows: Vec<Member>,
    next_id: i64,
    writes: usize,
}

impl MemberTable {
    fn apply(&mut self, upsert: &MemberUpsert) -> Member {
        let now = Utc::now();
        if let Some(row) = self.rows.iter_mut().find(|m| m.discord_id == upsert.discord_id) {
            row.name = upsert.name.clone();
            row.email = upsert.email.clone();
            row.department = upsert.department.as_str().to_string();
            row.role = upsert.role;
            row.updated_at = now;
            return row.clone();
        }

        self.next_id += 1;
        let member = Member {
            id: self.next_id,
            discord_id: upsert.discord_id,
            name: upsert.name.clone(),
            email: upsert.email.clone(),
            department: upsert.department.as_str().to_string(),
            role: upsert.role,
            created_at: now,
            updated_at: now,
        };
        self.rows.push(member.clone());
        member
    }
}

/// Member repository backed by a vector, in insertion (id) order
#[derive(Debug, Default)]
pub struct InMemoryMemberRepository {
    table: Mutex<MemberTable>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row with a raw department label, bypassing validation
    pub async fn seed(&self, discord_id: Snowflake, department: &str) -> Member {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        let now = Utc::now();
        let member = Member {
            id: table.next_id,
            discord_id,
            name: format!("member-{discord_id}"),
            email: None,
            department: department.to_string(),
            role: OrgRole::Member,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(member.clone());
        member
    }

    /// Number of write calls (`upsert`, `upsert_many`, delete) received
    pub async fn write_count(&self) -> usize {
        self.table.lock().await.writes
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn list(&self) -> RepoResult<Vec<Member>> {
        Ok(self.table.lock().await.rows.clone())
    }

    async fn find_by_discord_id(&self, discord_id: Snowflake) -> RepoResult<Option<Member>> {
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|m| m.discord_id == discord_id).cloned())
    }

    async fn upsert(&self, member: &MemberUpsert) -> RepoResult<Member> {
        let mut table = self.table.lock().await;
        table.writes += 1;
        Ok(table.apply(member))
    }

    async fn upsert_many(&self, members: &[MemberUpsert]) -> RepoResult<Vec<Member>> {
        let mut table = self.table.lock().await;
        table.writes += 1;
        Ok(members.iter().map(|m| table.apply(m)).collect())
    }

    async fn delete_by_discord_id(&self, discord_id: Snowflake) -> RepoResult<Member> {
        let mut table = self.table.lock().await;
        table.writes += 1;
        let index = table
            .rows
            .iter()
            .position(|m| m.discord_id == discord_id)
            .ok_or(DomainError::MemberNotFound(discord_id))?;
        Ok(table.rows.remove(index))
    }
}

// ============================================================================
// Admins
// ============================================================================

/// Admin repository backed by a vector
#[derive(Debug, Default)]
pub struct InMemoryAdminRepository {
    admins: Mutex<Vec<(AdminUser, String)>>,
}

impl InMemoryAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.admins.lock().await.len()
    }
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<AdminUser>> {
        let admins = self.admins.lock().await;
        Ok(admins.iter().find(|(a, _)| a.id == id).map(|(a, _)| a.clone()))
    }

    async fn find_credentials(&self, email: &str) -> RepoResult<Option<(AdminUser, String)>> {
        let admins = self.admins.lock().await;
        Ok(admins
            .iter()
            .find(|(a, _)| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> RepoResult<AdminUser> {
        let mut admins = self.admins.lock().await;
        if admins.iter().any(|(a, _)| a.email.eq_ignore_ascii_case(email)) {
            return Err(DomainError::AdminEmailExists);
        }
        let admin = AdminUser {
            id: admins.len() as i64 + 1,
            email: email.to_string(),
            created_at: Utc::now(),
        };
        admins.push((admin.clone(), password_hash.to_string()));
        Ok(admin)
    }
}

// ============================================================================
// Discord
// ============================================================================

/// A call received by [`RecordingGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    ListMembers {
        limit: u16,
        after: Option<Snowflake>,
    },
    AddRole {
        user_id: Snowflake,
        role_id: Snowflake,
    },
    RemoveRole {
        user_id: Snowflake,
        role_id: Snowflake,
    },
    EditInteraction {
        token: String,
        content: String,
    },
}

#[derive(Debug, Default)]
struct GuildState {
    members: HashMap<Snowflake, Vec<Snowflake>>,
    calls: Vec<GatewayCall>,
    failing_users: Vec<Snowflake>,
    fail_listing: bool,
    ignore_cursor: bool,
}

impl GuildState {
    fn snapshot(&self, user_id: Snowflake) -> RepoResult<GuildMemberSnapshot> {
        self.members
            .get(&user_id)
            .map(|roles| GuildMemberSnapshot::new(user_id, roles.clone()))
            .ok_or_else(|| DomainError::PlatformFetch {
                status: 404,
                body: r#"{"message": "Unknown Member", "code": 10007}"#.to_string(),
            })
    }

    fn check_failure(&self, user_id: Snowflake) -> RepoResult<()> {
        if self.failing_users.contains(&user_id) {
            return Err(DomainError::PlatformUpdate {
                status: 403,
                body: r#"{"message": "Missing Permissions", "code": 50013}"#.to_string(),
            });
        }
        Ok(())
    }
}

/// Guild gateway that keeps member roles in memory and records every call
#[derive(Debug, Default)]
pub struct RecordingGateway {
    state: Mutex<GuildState>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a user in the guild holding `roles`
    pub async fn add_guild_member(&self, user_id: Snowflake, roles: &[Snowflake]) {
        self.state.lock().await.members.insert(user_id, roles.to_vec());
    }

    /// Roles currently held by a guild member
    pub async fn roles_of(&self, user_id: Snowflake) -> Option<Vec<Snowflake>> {
        self.state.lock().await.members.get(&user_id).cloned()
    }

    /// Make role updates for `user_id` fail with 403
    pub async fn fail_updates_for(&self, user_id: Snowflake) {
        self.state.lock().await.failing_users.push(user_id);
    }

    /// Make member listing fail with 500
    pub async fn fail_listing(&self) {
        self.state.lock().await.fail_listing = true;
    }

    /// Serve every listing from the first member, ignoring `after`
    pub async fn ignore_listing_cursor(&self) {
        self.state.lock().await.ignore_cursor = true;
    }

    /// Every call received so far
    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().await.calls.clone()
    }

    /// Role add/remove calls received so far
    pub async fn role_calls(&self) -> Vec<GatewayCall> {
        self.calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, GatewayCall::AddRole { .. } | GatewayCall::RemoveRole { .. }))
            .collect()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }
}

#[async_trait]
impl GuildGateway for RecordingGateway {
    async fn list_members(
        &self,
        _guild_id: Snowflake,
        limit: u16,
        after: Option<Snowflake>,
    ) -> RepoResult<Vec<GuildMemberSnapshot>> {
        let mut state = self.state.lock().await;
        state.calls.push(GatewayCall::ListMembers { limit, after });
        if state.fail_listing {
            return Err(DomainError::PlatformFetch {
                status: 500,
                body: "upstream unavailable".to_string(),
            });
        }

        let after = if state.ignore_cursor { None } else { after };
        let mut ids: Vec<Snowflake> = state
            .members
            .keys()
            .copied()
            .filter(|id| after.map_or(true, |a| *id > a))
            .collect();
        ids.sort();
        ids.truncate(usize::from(limit));

        ids.into_iter().map(|id| state.snapshot(id)).collect()
    }

    async fn add_role(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<GuildMemberSnapshot> {
        let mut state = self.state.lock().await;
        state.calls.push(GatewayCall::AddRole { user_id, role_id });
        let current = state.snapshot(user_id)?;
        state.check_failure(user_id)?;
        state.members.insert(user_id, current.roles_with(role_id));
        state.snapshot(user_id)
    }

    async fn remove_role(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<GuildMemberSnapshot> {
        let mut state = self.state.lock().await;
        state.calls.push(GatewayCall::RemoveRole { user_id, role_id });
        let current = state.snapshot(user_id)?;
        state.check_failure(user_id)?;
        state.members.insert(user_id, current.roles_without(role_id));
        state.snapshot(user_id)
    }

    async fn edit_interaction_response(
        &self,
        interaction_token: &str,
        content: &str,
    ) -> RepoResult<serde_json::Value> {
        let mut state = self.state.lock().await;
        state.calls.push(GatewayCall::EditInteraction {
            token: interaction_token.to_string(),
            content: content.to_string(),
        });
        Ok(serde_json::json!({ "id": "1", "content": content }))
    }
}

// ============================================================================
// Context
// ============================================================================

/// A service context wired to fresh fakes
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub members: Arc<InMemoryMemberRepository>,
    pub admins: Arc<InMemoryAdminRepository>,
    pub gateway: Arc<RecordingGateway>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_page_size(1000)
    }

    /// Harness whose guild listing uses pages of `page_size` members
    pub fn with_page_size(page_size: u16) -> Self {
        let members = Arc::new(InMemoryMemberRepository::new());
        let admins = Arc::new(InMemoryAdminRepository::new());
        let gateway = Arc::new(RecordingGateway::new());

        let ctx = ServiceContextBuilder::new()
            .member_repo(members.clone())
            .admin_repo(admins.clone())
            .gateway(gateway.clone())
            .role_map(test_role_map())
            .sync(SyncSettings {
                secret: SharedSecret::new(SYNC_KEY),
                default_guild: Some(GUILD_ID),
                page_size,
            })
            .jwt_service(Arc::new(JwtService::new(JWT_SECRET, 3600)))
            .build()
            .unwrap_or_else(|e| panic!("test context: {e}"));

        Self {
            ctx,
            members,
            admins,
            gateway,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
