//! Authentication handlers

use axum::{extract::State, Json};
use roster_service::dto::{AdminResponse, LoginRequest, LoginResponse};
use roster_service::AuthService;

use crate::extractors::{AuthAdmin, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Admin owning the presented session
///
/// GET /auth/me
pub async fn current_admin(
    State(state): State<AppState>,
    auth: AuthAdmin,
) -> ApiResult<Json<AdminResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.current_admin(auth.admin_id).await?;
    Ok(Json(response))
}
