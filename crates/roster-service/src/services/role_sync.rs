//! Role sync service
//!
//! Brings Discord department roles in line with the roster. A full
//! reconciliation walks every roster member; a single assignment answers a
//! Discord interaction for one member. Both are gated by the shared sync key.

use roster_core::{
    index_guild_members, is_valid_interaction_token, plan, DomainError, GuildMemberSnapshot,
    Member, MemberPlan, Snowflake,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::dto::{SingleAssignResponse, SingleRoleRequest, SyncRolesRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Message written into the interaction once a single assignment finishes
pub const INTERACTION_REPLY: &str = "departments synced!";

/// What reconciliation did for one roster member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    NotInGuild,
    InvalidDepartment { department: String },
    AlreadyInSync,
    Updated {
        removed: Vec<Snowflake>,
        added: Snowflake,
    },
    Failed { reason: String },
}

impl SyncOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::NotInGuild => "not_in_guild",
            Self::InvalidDepartment { .. } => "invalid_department",
            Self::AlreadyInSync => "already_in_sync",
            Self::Updated { .. } => "updated",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Outcome for one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberOutcome {
    pub discord_id: Snowflake,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

/// Outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    pub total: usize,
    pub updated: usize,
    pub already_in_sync: usize,
    pub not_in_guild: usize,
    pub invalid_department: usize,
    pub failed: usize,
}

/// Result of a reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub guild_id: Snowflake,
    pub outcomes: Vec<MemberOutcome>,
}

impl SyncReport {
    pub fn counts(&self) -> SyncCounts {
        let mut counts = SyncCounts {
            total: self.outcomes.len(),
            ..SyncCounts::default()
        };
        for entry in &self.outcomes {
            match entry.outcome {
                SyncOutcome::NotInGuild => counts.not_in_guild += 1,
                SyncOutcome::InvalidDepartment { .. } => counts.invalid_department += 1,
                SyncOutcome::AlreadyInSync => counts.already_in_sync += 1,
                SyncOutcome::Updated { .. } => counts.updated += 1,
                SyncOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    pub fn outcome_for(&self, discord_id: Snowflake) -> Option<&SyncOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.discord_id == discord_id)
            .map(|o| &o.outcome)
    }
}

/// Role sync service
pub struct RoleSyncService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoleSyncService<'a> {
    /// Create a new RoleSyncService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check the caller's sync key
    ///
    /// # Errors
    /// Returns `InvalidSyncKey` (401) on mismatch
    pub fn verify_key(&self, key: &str) -> ServiceResult<()> {
        if self.ctx.sync().secret.matches(key) {
            Ok(())
        } else {
            warn!("Rejected role sync request with invalid key");
            Err(DomainError::InvalidSyncKey.into())
        }
    }

    /// The requested guild, or the configured default
    pub fn resolve_guild(&self, requested: Option<&str>) -> ServiceResult<Snowflake> {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => match Snowflake::parse(raw) {
                Ok(id) if !id.is_zero() => Ok(id),
                _ => Err(ServiceError::validation(format!("invalid guild_id '{raw}'"))),
            },
            None => self.ctx.sync().default_guild.ok_or_else(|| {
                ServiceError::validation("guild_id is required when no default guild is configured")
            }),
        }
    }

    /// Handle `POST /roles/sync`
    pub async fn sync(&self, request: SyncRolesRequest) -> ServiceResult<SyncReport> {
        self.verify_key(&request.key)?;
        let guild_id = self.resolve_guild(request.guild_id.as_deref())?;
        self.reconcile(guild_id).await
    }

    /// Reconcile every roster member's department role in `guild_id`
    ///
    /// Failures listing the roster or the guild abort the run. A failed role
    /// update only marks that member as failed.
    #[instrument(skip_all, fields(guild_id = %guild_id))]
    pub async fn reconcile(&self, guild_id: Snowflake) -> ServiceResult<SyncReport> {
        let members = self.ctx.member_repo().list().await?;
        let guild_members = self.fetch_guild_members(guild_id).await?;
        let index = index_guild_members(&guild_members);

        let mut outcomes = Vec::with_capacity(members.len());
        for member in &members {
            let member_plan = plan(
                member,
                index.get(&member.discord_id).copied(),
                self.ctx.role_map(),
            );
            let outcome = self.apply(guild_id, member, member_plan).await;
            log_outcome(member, &outcome);
            outcomes.push(MemberOutcome {
                discord_id: member.discord_id,
                outcome,
            });
        }

        let report = SyncReport { guild_id, outcomes };
        let counts = report.counts();
        info!(
            total = counts.total,
            updated = counts.updated,
            already_in_sync = counts.already_in_sync,
            not_in_guild = counts.not_in_guild,
            invalid_department = counts.invalid_department,
            failed = counts.failed,
            "Role reconciliation finished"
        );

        Ok(report)
    }

    /// Handle `POST /roles/single`
    ///
    /// Adds the member's department role (never removes) and then edits the
    /// interaction message.
    ///
    /// # Errors
    /// Returns `MemberNotFound` (404) without touching Discord when the member
    /// is not on the roster
    #[instrument(skip_all, fields(member_id = %request.member_id))]
    pub async fn assign_single(
        &self,
        request: SingleRoleRequest,
    ) -> ServiceResult<SingleAssignResponse> {
        self.verify_key(&request.key)?;
        let guild_id = self.resolve_guild(request.guild_id.as_deref())?;

        let member_id = match Snowflake::parse(&request.member_id) {
            Ok(id) if !id.is_zero() => id,
            _ => {
                return Err(ServiceError::validation(format!(
                    "invalid member_id '{}'",
                    request.member_id.trim()
                )))
            }
        };
        let token = request.interaction_token.trim();
        if token.is_empty() {
            return Err(ServiceError::validation("interaction_token is required"));
        }
        if !is_valid_interaction_token(token) {
            return Err(ServiceError::validation(
                "interaction_token may only contain letters, digits, '.', '_' and '-'",
            ));
        }

        let member = self
            .ctx
            .member_repo()
            .find_by_discord_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(member_id))?;

        match member.department_kind() {
            Some(department) => {
                let role_id = self.ctx.role_map().role_for(department);
                self.ctx
                    .gateway()
                    .add_role(guild_id, member_id, role_id)
                    .await?;
                info!(discord_id = %member_id, role_id = %role_id, "Department role assigned");
            }
            None => {
                warn!(
                    discord_id = %member_id,
                    department = %member.department,
                    "Member has no known department; no role assigned"
                );
            }
        }

        let response = self
            .ctx
            .gateway()
            .edit_interaction_response(token, INTERACTION_REPLY)
            .await?;

        Ok(SingleAssignResponse {
            success: true,
            response,
        })
    }

    /// List every guild member, one page at a time
    async fn fetch_guild_members(
        &self,
        guild_id: Snowflake,
    ) -> ServiceResult<Vec<GuildMemberSnapshot>> {
        let page_size = self.ctx.sync().page_size;
        let mut all = Vec::new();
        let mut after = None;

        loop {
            let page = self
                .ctx
                .gateway()
                .list_members(guild_id, page_size, after)
                .await?;
            let full_page = page.len() >= usize::from(page_size);
            let last = page.last().map(|m| m.user_id);
            all.extend(page);

            // A full page that does not move the cursor forward would repeat forever
            let advanced = match (last, after) {
                (Some(last), Some(previous)) => last > previous,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if !full_page || !advanced {
                if full_page {
                    warn!(after = ?after, "Guild listing did not advance; stopping pagination");
                }
                break;
            }
            after = last;
        }

        info!(guild_members = all.len(), "Fetched guild members");
        Ok(all)
    }

    async fn apply(&self, guild_id: Snowflake, member: &Member, plan: MemberPlan) -> SyncOutcome {
        match plan {
            MemberPlan::NotInGuild => SyncOutcome::NotInGuild,
            MemberPlan::InvalidDepartment { department } => {
                SyncOutcome::InvalidDepartment { department }
            }
            MemberPlan::AlreadyInSync { .. } => SyncOutcome::AlreadyInSync,
            MemberPlan::Converge { remove, add } => {
                let gateway = self.ctx.gateway();
                for &role_id in &remove {
                    if let Err(e) = gateway
                        .remove_role(guild_id, member.discord_id, role_id)
                        .await
                    {
                        return SyncOutcome::Failed {
                            reason: format!("removing role {role_id}: {e}"),
                        };
                    }
                }
                if let Err(e) = gateway.add_role(guild_id, member.discord_id, add).await {
                    return SyncOutcome::Failed {
                        reason: format!("adding role {add}: {e}"),
                    };
                }
                SyncOutcome::Updated {
                    removed: remove,
                    added: add,
                }
            }
        }
    }
}

fn log_outcome(member: &Member, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Failed { reason } => warn!(
            discord_id = %member.discord_id,
            outcome = outcome.label(),
            reason = %reason,
            "Role update failed"
        ),
        SyncOutcome::InvalidDepartment { department } => warn!(
            discord_id = %member.discord_id,
            outcome = outcome.label(),
            department = %department,
            "Member skipped"
        ),
        SyncOutcome::Updated { removed, added } => info!(
            discord_id = %member.discord_id,
            outcome = outcome.label(),
            removed = ?removed,
            added = %added,
            "Member roles updated"
        ),
        SyncOutcome::NotInGuild | SyncOutcome::AlreadyInSync => info!(
            discord_id = %member.discord_id,
            outcome = outcome.label(),
            "Member checked"
        ),
    }
}
