//! Request DTOs for API endpoints
//!
//! Bodies deserialize leniently (Discord ids as strings or numbers, the
//! camelCase names older callers send) and are checked before they reach a
//! repository.

use std::fmt;

use serde::{Deserialize, Deserializer};
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Admin login request
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Member Requests
// ============================================================================

/// Create-or-update request for one roster member, keyed by `discord_id`
///
/// Also the row type of the bulk JSON import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpsertMemberRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "discordId", deserialize_with = "id_string")]
    pub discord_id: String,

    #[validate(email(message = "email is not a valid address"))]
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub department: String,

    #[serde(default = "default_role")]
    pub role: String,
}

impl UpsertMemberRequest {
    /// Trim every field and treat a blank email as absent
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.discord_id = self.discord_id.trim().to_string();
        self.department = self.department.trim().to_string();
        self.role = self.role.trim().to_string();
        self.email = self
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        self
    }
}

fn default_role() -> String {
    "MEMBER".to_string()
}

/// Delete request body: `{ "discord_id": "..." }`
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteMemberRequest {
    #[serde(alias = "discordId", deserialize_with = "id_string")]
    pub discord_id: String,
}

// ============================================================================
// Role Requests
// ============================================================================

/// Full role reconciliation request
#[derive(Clone, Deserialize)]
pub struct SyncRolesRequest {
    /// Defaults to the configured guild when absent or blank
    #[serde(default, alias = "guildId", deserialize_with = "optional_id_string")]
    pub guild_id: Option<String>,

    #[serde(default)]
    pub key: String,
}

impl fmt::Debug for SyncRolesRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncRolesRequest")
            .field("guild_id", &self.guild_id)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Single-member role assignment triggered by a Discord interaction
#[derive(Clone, Deserialize)]
pub struct SingleRoleRequest {
    #[serde(default, alias = "guildId", deserialize_with = "optional_id_string")]
    pub guild_id: Option<String>,

    #[serde(default, alias = "memberId", deserialize_with = "id_string")]
    pub member_id: String,

    #[serde(default, alias = "interactionToken")]
    pub interaction_token: String,

    #[serde(default)]
    pub key: String,
}

impl fmt::Debug for SingleRoleRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleRoleRequest")
            .field("guild_id", &self.guild_id)
            .field("member_id", &self.member_id)
            .field("interaction_token", &"[REDACTED]")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Id helpers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(u64),
}

impl From<IdRepr> for String {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Text(s) => s,
            IdRepr::Number(n) => n.to_string(),
        }
    }
}

/// Accept a Discord id written either as a JSON string or a JSON number
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    IdRepr::deserialize(deserializer).map(String::from)
}

fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdRepr>::deserialize(deserializer)?
        .map(String::from)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_accepts_numeric_id_and_defaults_role() {
        let req: UpsertMemberRequest = serde_json::from_str(
            r#"{"name": "Ada", "discord_id": 1234567890123, "department": "design"}"#,
        )
        .unwrap();
        assert_eq!(req.discord_id, "1234567890123");
        assert_eq!(req.role, "MEMBER");
        assert_eq!(req.email, None);
    }

    #[test]
    fn test_normalized_drops_blank_email() {
        let req = UpsertMemberRequest {
            name: "  Ada ".to_string(),
            discord_id: " 42 ".to_string(),
            email: Some("   ".to_string()),
            department: " Design".to_string(),
            role: "Member ".to_string(),
        }
        .normalized();

        assert_eq!(req.name, "Ada");
        assert_eq!(req.discord_id, "42");
        assert_eq!(req.email, None);
        assert_eq!(req.department, "Design");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_invalid_email_fails_validation() {
        let req = UpsertMemberRequest {
            name: "Ada".to_string(),
            discord_id: "42".to_string(),
            email: Some("not-an-email".to_string()),
            department: "DESIGN".to_string(),
            role: "MEMBER".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_single_role_request_camel_case() {
        let req: SingleRoleRequest = serde_json::from_str(
            r#"{"guildId": "", "memberId": "77", "interactionToken": "tok", "key": "k"}"#,
        )
        .unwrap();
        assert_eq!(req.guild_id, None);
        assert_eq!(req.member_id, "77");
        assert_eq!(req.interaction_token, "tok");
        assert!(!format!("{req:?}").contains("tok"));
    }

    #[test]
    fn test_sync_request_without_guild() {
        let req: SyncRolesRequest = serde_json::from_str(r#"{"key": "secret"}"#).unwrap();
        assert_eq!(req.guild_id, None);
        assert_eq!(req.key, "secret");
        assert!(!format!("{req:?}").contains("secret"));
    }
}
