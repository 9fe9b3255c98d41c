//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use roster_core::{OrgRole, Snowflake};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Admin account as exposed to clients
#[derive(Debug, Clone, Serialize)]
pub struct AdminResponse {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Session issued by `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub admin: AdminResponse,
}

// ============================================================================
// Member Responses
// ============================================================================

/// Roster member
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: i64,
    pub discord_id: Snowflake,
    pub name: String,
    pub email: Option<String>,
    /// Stored label; canonical upper-case for rows written by this service
    pub department: String,
    /// Display name of the department, absent for unknown labels
    pub department_name: Option<&'static str>,
    pub role: OrgRole,
    pub role_name: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a bulk import
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub members: Vec<MemberResponse>,
}

impl ImportResponse {
    pub fn new(members: Vec<MemberResponse>) -> Self {
        Self {
            imported: members.len(),
            members,
        }
    }
}

// ============================================================================
// Role Responses
// ============================================================================

/// Result of a single-member role assignment
#[derive(Debug, Clone, Serialize)]
pub struct SingleAssignResponse {
    pub success: bool,
    /// Discord's reply to the interaction edit, `null` when it sent no body
    pub response: serde_json::Value,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
