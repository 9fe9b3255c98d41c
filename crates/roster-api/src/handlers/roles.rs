//! Role sync handlers
//!
//! Machine-to-machine endpoints authorized by the shared sync key in the body.

use axum::{extract::State, http::StatusCode, Json};
use roster_service::dto::{SingleAssignResponse, SingleRoleRequest, SyncRolesRequest};
use roster_service::RoleSyncService;

use crate::extractors::JsonBody;
use crate::response::ApiResult;
use crate::state::AppState;

/// Body returned by a completed sync run
pub const SYNC_DONE: &str = "Roles updated";

/// Reconcile every roster member's department role
///
/// POST /roles/sync
///
/// Answers 200 once the run finishes, even when some members failed; the
/// per-member outcomes are logged.
pub async fn sync_roles(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SyncRolesRequest>,
) -> ApiResult<(StatusCode, &'static str)> {
    let service = RoleSyncService::new(state.service_context());
    let report = service.sync(request).await?;

    let counts = report.counts();
    if counts.failed > 0 {
        tracing::warn!(
            guild_id = %report.guild_id,
            failed = counts.failed,
            "Role sync finished with failures"
        );
    }

    Ok((StatusCode::OK, SYNC_DONE))
}

/// Give one member its department role and answer the Discord interaction
///
/// POST /roles/single
pub async fn assign_single_role(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SingleRoleRequest>,
) -> ApiResult<Json<SingleAssignResponse>> {
    let service = RoleSyncService::new(state.service_context());
    Ok(Json(service.assign_single(request).await?))
}
