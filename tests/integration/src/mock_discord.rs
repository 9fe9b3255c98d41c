//! In-process mock of the Discord REST endpoints the roster client uses

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Bot token the mock accepts
pub const MOCK_BOT_TOKEN: &str = "integration-bot-token";

/// A request that changed state on the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    SetRoles { user_id: i64, roles: Vec<i64> },
    EditInteraction { token: String, content: String },
}

#[derive(Default)]
struct MockState {
    /// user id -> role ids
    members: BTreeMap<i64, Vec<i64>>,
    calls: Vec<MockCall>,
}

type Shared = Arc<Mutex<MockState>>;

/// Running mock server; stopped when dropped
pub struct MockDiscord {
    pub addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockDiscord {
    /// Start the mock on an ephemeral port
    pub async fn start() -> Result<Self> {
        let state = Shared::default();
        let app = Router::new()
            .route("/guilds/:guild/members", get(list_members))
            .route(
                "/guilds/:guild/members/:user",
                get(get_member).patch(patch_member),
            )
            .route("/webhooks/:application/:token", patch(edit_interaction))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Base URL to configure as `DISCORD_API_BASE`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Put a user in the guild holding `roles`
    pub fn add_member(&self, user_id: i64, roles: &[i64]) {
        self.lock().members.insert(user_id, roles.to_vec());
    }

    /// Roles currently held by a guild member
    pub fn roles_of(&self, user_id: i64) -> Option<Vec<i64>> {
        self.lock().members.get(&user_id).cloned()
    }

    /// State-changing calls received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Drop for MockDiscord {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bot {MOCK_BOT_TOKEN}"))
}

fn member_json(user_id: i64, roles: &[i64]) -> Value {
    let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
    json!({ "user": { "id": user_id.to_string() }, "roles": roles })
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message, "code": 0 }))).into_response()
}

fn shared(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[derive(Deserialize)]
struct ListQuery {
    limit: usize,
    after: Option<i64>,
}

async fn list_members(
    State(state): State<Shared>,
    Path(_guild): Path<i64>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "401: Unauthorized");
    }
    let state = shared(&state);
    let after = query.after.unwrap_or(0);
    let page: Vec<Value> = state
        .members
        .iter()
        .filter(|(id, _)| **id > after)
        .take(query.limit)
        .map(|(id, roles)| member_json(*id, roles))
        .collect();
    Json(page).into_response()
}

async fn get_member(
    State(state): State<Shared>,
    Path((_guild, user)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "401: Unauthorized");
    }
    match shared(&state).members.get(&user) {
        Some(roles) => Json(member_json(user, roles)).into_response(),
        None => error(StatusCode::NOT_FOUND, "Unknown Member"),
    }
}

#[derive(Deserialize)]
struct RolesBody {
    roles: Vec<String>,
}

async fn patch_member(
    State(state): State<Shared>,
    Path((_guild, user)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(body): Json<RolesBody>,
) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "401: Unauthorized");
    }
    let roles: Vec<i64> = body.roles.iter().filter_map(|r| r.parse().ok()).collect();
    let mut state = shared(&state);
    if !state.members.contains_key(&user) {
        return error(StatusCode::NOT_FOUND, "Unknown Member");
    }
    state.calls.push(MockCall::SetRoles {
        user_id: user,
        roles: roles.clone(),
    });
    state.members.insert(user, roles.clone());
    Json(member_json(user, &roles)).into_response()
}

async fn edit_interaction(
    State(state): State<Shared>,
    Path((_application, token)): Path<(i64, String)>,
    Json(body): Json<Value>,
) -> Response {
    let content = body["data"]["content"].as_str().unwrap_or_default().to_string();
    shared(&state).calls.push(MockCall::EditInteraction {
        token,
        content: content.clone(),
    });
    Json(json!({ "id": "1", "content": content })).into_response()
}
