//! Route definitions

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{auth, health, members, roles};
use crate::state::AppState;

/// Create the API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(member_routes())
        .merge(role_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::current_admin))
}

/// Roster routes (session required)
fn member_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/members",
            get(members::list_members)
                .post(members::upsert_member)
                .delete(members::delete_member_by_body),
        )
        .route("/members/:discord_id", delete(members::delete_member))
        .route("/members/bulk", post(members::import_members))
        .route("/members/import", post(members::import_table))
}

/// Role sync routes (shared secret required)
fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/roles/sync", post(roles::sync_roles))
        .route("/roles/single", post(roles::assign_single_role))
}
