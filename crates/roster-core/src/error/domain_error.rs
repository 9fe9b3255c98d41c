//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    #[error("Admin not found")]
    AdminNotFound,

    #[error("User {0} is not a member of the guild")]
    GuildMemberNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid department: {0}")]
    InvalidDepartment(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Invalid sync key")]
    InvalidSyncKey,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Admin email already in use")]
    AdminEmailExists,

    // =========================================================================
    // Chat Platform Errors
    // =========================================================================
    #[error("Discord client is not configured: {0}")]
    PlatformConfiguration(String),

    #[error("Failed to fetch from Discord: {status} {body}")]
    PlatformFetch { status: u16, body: String },

    #[error("Failed to update Discord: {status} {body}")]
    PlatformUpdate { status: u16, body: String },

    #[error("Discord request failed: {0}")]
    PlatformTransport(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::AdminNotFound => "UNKNOWN_ADMIN",
            Self::GuildMemberNotFound(_) => "UNKNOWN_GUILD_MEMBER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidDepartment(_) => "INVALID_DEPARTMENT",
            Self::InvalidRole(_) => "INVALID_ROLE",

            // Authorization
            Self::InvalidSyncKey => "INVALID_SYNC_KEY",

            // Conflict
            Self::AdminEmailExists => "ADMIN_EMAIL_EXISTS",

            // Chat platform
            Self::PlatformConfiguration(_) => "DISCORD_NOT_CONFIGURED",
            Self::PlatformFetch { .. } => "DISCORD_FETCH_FAILED",
            Self::PlatformUpdate { .. } => "DISCORD_UPDATE_FAILED",
            Self::PlatformTransport(_) => "DISCORD_UNREACHABLE",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MemberNotFound(_) | Self::AdminNotFound | Self::GuildMemberNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidDepartment(_) | Self::InvalidRole(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::InvalidSyncKey)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AdminEmailExists)
    }

    /// Check if this error came from the chat platform
    pub fn is_platform(&self) -> bool {
        matches!(
            self,
            Self::PlatformConfiguration(_)
                | Self::PlatformFetch { .. }
                | Self::PlatformUpdate { .. }
                | Self::PlatformTransport(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::MemberNotFound(Snowflake::new(1));
        assert_eq!(err.code(), "UNKNOWN_MEMBER");

        let err = DomainError::PlatformFetch {
            status: 404,
            body: "{}".to_string(),
        };
        assert_eq!(err.code(), "DISCORD_FETCH_FAILED");
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::MemberNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::InvalidDepartment("x".to_string()).is_validation());
        assert!(DomainError::InvalidSyncKey.is_authorization());
        assert!(DomainError::PlatformTransport("timeout".to_string()).is_platform());
        assert!(!DomainError::DatabaseError("down".to_string()).is_platform());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::PlatformUpdate {
            status: 403,
            body: "Missing Permissions".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to update Discord: 403 Missing Permissions"
        );
    }
}
