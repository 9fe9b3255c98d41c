//! Member service
//!
//! Roster CRUD and bulk import. Imports validate the whole batch before any
//! write and store it in one transaction.

use std::collections::HashSet;

use roster_core::{Department, MemberUpsert, OrgRole, Snowflake};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{parse_roster_table, ImportResponse, MemberResponse, UpsertMemberRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Member service
pub struct MemberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberService<'a> {
    /// Create a new MemberService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List the whole roster in store order
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<MemberResponse>> {
        let members = self.ctx.member_repo().list().await?;
        Ok(members.into_iter().map(MemberResponse::from).collect())
    }

    /// Create or update one member, keyed by its Discord id
    #[instrument(skip_all, fields(discord_id = %request.discord_id))]
    pub async fn upsert(&self, request: UpsertMemberRequest) -> ServiceResult<MemberResponse> {
        let upsert = to_upsert(request.normalized()).map_err(|problems| {
            ServiceError::validation(problems.join("; "))
        })?;

        let member = self.ctx.member_repo().upsert(&upsert).await?;
        info!(member_id = member.id, discord_id = %member.discord_id, "Member saved");

        Ok(member.into())
    }

    /// Delete a member by Discord id
    ///
    /// # Errors
    /// Returns `MemberNotFound` (404) when no member has that id
    #[instrument(skip(self))]
    pub async fn delete(&self, discord_id: &str) -> ServiceResult<MemberResponse> {
        let discord_id = parse_discord_id(discord_id).map_err(ServiceError::validation)?;

        let member = self.ctx.member_repo().delete_by_discord_id(discord_id).await?;
        info!(member_id = member.id, discord_id = %discord_id, "Member deleted");

        Ok(member.into())
    }

    /// Import a JSON batch; rows are named by 1-based position
    #[instrument(skip_all, fields(rows = requests.len()))]
    pub async fn import_members(
        &self,
        requests: Vec<UpsertMemberRequest>,
    ) -> ServiceResult<ImportResponse> {
        let rows = requests
            .into_iter()
            .enumerate()
            .map(|(i, request)| (format!("row {}", i + 1), request))
            .collect();
        self.import(rows).await
    }

    /// Import a tab- or comma-separated table; rows are named by line number
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub async fn import_table(&self, text: &str) -> ServiceResult<ImportResponse> {
        let rows = parse_roster_table(text)?
            .into_iter()
            .map(|row| (format!("line {}", row.line), row.request))
            .collect();
        self.import(rows).await
    }

    async fn import(
        &self,
        rows: Vec<(String, UpsertMemberRequest)>,
    ) -> ServiceResult<ImportResponse> {
        let batch = validate_batch(rows).map_err(|problems| {
            warn!(invalid_rows = problems.len(), "Member import rejected");
            ServiceError::validation(problems.join("; "))
        })?;

        let members = self.ctx.member_repo().upsert_many(&batch).await?;
        info!(imported = members.len(), "Members imported");

        Ok(ImportResponse::new(
            members.into_iter().map(MemberResponse::from).collect(),
        ))
    }
}

/// Validate every row, collecting all problems before anything is written
fn validate_batch(
    rows: Vec<(String, UpsertMemberRequest)>,
) -> Result<Vec<MemberUpsert>, Vec<String>> {
    if rows.is_empty() {
        return Err(vec!["import contains no members".to_string()]);
    }

    let mut problems = Vec::new();
    let mut batch = Vec::with_capacity(rows.len());
    let mut seen = HashSet::new();

    for (label, request) in rows {
        match to_upsert(request.normalized()) {
            Ok(upsert) if !seen.insert(upsert.discord_id) => problems.push(format!(
                "{label}: discord_id {} appears more than once",
                upsert.discord_id
            )),
            Ok(upsert) => batch.push(upsert),
            Err(row_problems) => problems.push(format!("{label}: {}", row_problems.join(", "))),
        }
    }

    if problems.is_empty() {
        Ok(batch)
    } else {
        Err(problems)
    }
}

/// Turn a normalized request into a validated upsert
fn to_upsert(request: UpsertMemberRequest) -> Result<MemberUpsert, Vec<String>> {
    let mut problems = Vec::new();

    if let Err(errors) = request.validate() {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for (field, field_errors) in fields {
            for error in field_errors {
                problems.push(match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                });
            }
        }
    }

    let discord_id = parse_discord_id(&request.discord_id)
        .map_err(|e| problems.push(e))
        .ok();

    let department = request
        .department
        .parse::<Department>()
        .map_err(|_| {
            problems.push(format!("invalid department '{}'", request.department));
        })
        .ok();

    let role = request
        .role
        .parse::<OrgRole>()
        .map_err(|_| problems.push(format!("invalid role '{}'", request.role)))
        .ok();

    match (discord_id, department, role) {
        (Some(discord_id), Some(department), Some(role)) if problems.is_empty() => {
            Ok(MemberUpsert {
                discord_id,
                name: request.name,
                email: request.email,
                department,
                role,
            })
        }
        _ => Err(problems),
    }
}

fn parse_discord_id(raw: &str) -> Result<Snowflake, String> {
    if raw.trim().is_empty() {
        return Err("discord_id is required".to_string());
    }
    match Snowflake::parse(raw) {
        Ok(id) if !id.is_zero() => Ok(id),
        _ => Err(format!("invalid discord_id '{}'", raw.trim())),
    }
}
