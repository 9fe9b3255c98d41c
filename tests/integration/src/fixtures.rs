//! Test fixtures and data generators

use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

pub const GUILD_ID: i64 = 1_100_000_000_000_000_001;
pub const APPLICATION_ID: i64 = 1_100_000_000_000_000_002;
pub const TECHNICAL_ROLE: i64 = 1_292_540_786_759_700_623;
pub const DESIGN_ROLE: i64 = 1_292_540_869_433_491_466;
pub const MARKETING_ROLE: i64 = 1_292_540_932_054_585_384;
pub const MANAGEMENT_ROLE: i64 = 1_292_540_937_653_715_088;
pub const SYNC_KEY: &str = "integration-sync-key";
pub const ADMIN_PASSWORD: &str = "integration-pass-2024";

/// Counter for unique test data
static COUNTER: AtomicI64 = AtomicI64::new(1);

/// Discord-like id unique across test runs sharing one database
pub fn unique_discord_id() -> i64 {
    chrono::Utc::now().timestamp_micros() * 100 + COUNTER.fetch_add(1, Ordering::SeqCst) % 100
}

/// Admin email unique to one test server
pub fn unique_admin_email() -> String {
    format!("admin{}@example.com", unique_discord_id())
}

/// Member row as posted to `/members` and `/members/bulk`
#[derive(Debug, Clone, Serialize)]
pub struct MemberRow {
    pub name: String,
    pub discord_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub department: String,
    pub role: String,
}

impl MemberRow {
    pub fn new(discord_id: i64, department: &str) -> Self {
        Self {
            name: format!("member {discord_id}"),
            discord_id: discord_id.to_string(),
            email: None,
            department: department.to_string(),
            role: "MEMBER".to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Member response
#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub id: i64,
    pub discord_id: String,
    pub name: String,
    pub email: Option<String>,
    pub department: String,
    pub role: String,
}

/// Bulk import response
#[derive(Debug, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub members: Vec<MemberResponse>,
}

/// Error response body
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
