//! Roster member handlers
//!
//! Every endpoint requires an admin session.

use axum::{
    extract::{Path, State},
    Json,
};
use roster_service::dto::{
    DeleteMemberRequest, ImportResponse, MemberResponse, UpsertMemberRequest,
};
use roster_service::MemberService;

use crate::extractors::{AuthAdmin, JsonBody};
use crate::response::ApiResult;
use crate::state::AppState;

/// List the roster
///
/// GET /members
pub async fn list_members(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.list().await?))
}

/// Create or update a member by Discord id
///
/// POST /members
pub async fn upsert_member(
    State(state): State<AppState>,
    auth: AuthAdmin,
    JsonBody(request): JsonBody<UpsertMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    tracing::debug!(admin_id = auth.admin_id, "Upserting member");
    let service = MemberService::new(state.service_context());
    Ok(Json(service.upsert(request).await?))
}

/// Delete a member named in the body
///
/// DELETE /members
pub async fn delete_member_by_body(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    JsonBody(request): JsonBody<DeleteMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.delete(&request.discord_id).await?))
}

/// Delete a member named in the path
///
/// DELETE /members/:discord_id
pub async fn delete_member(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(discord_id): Path<String>,
) -> ApiResult<Json<MemberResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.delete(&discord_id).await?))
}

/// Import a JSON array of members
///
/// POST /members/bulk
pub async fn import_members(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    JsonBody(requests): JsonBody<Vec<UpsertMemberRequest>>,
) -> ApiResult<Json<ImportResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.import_members(requests).await?))
}

/// Import a tab- or comma-separated roster table
///
/// POST /members/import
pub async fn import_table(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    body: String,
) -> ApiResult<Json<ImportResponse>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.import_table(&body).await?))
}
