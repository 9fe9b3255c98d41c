//! Member entity - one row of the organization roster

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Department a member belongs to
///
/// Each department maps to exactly one Discord role (see `DepartmentRoleMap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    Technical,
    Design,
    Marketing,
    Management,
}

impl Department {
    /// All departments, in declaration order
    pub const ALL: [Department; 4] = [
        Department::Technical,
        Department::Design,
        Department::Marketing,
        Department::Management,
    ];

    /// Canonical stored name (upper-case)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "TECHNICAL",
            Self::Design => "DESIGN",
            Self::Marketing => "MARKETING",
            Self::Management => "MANAGEMENT",
        }
    }

    /// Human-readable name used by the admin table
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Design => "Design",
            Self::Marketing => "Marketing",
            Self::Management => "Management",
        }
    }

    /// Normalize a free-form label into a department
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn normalize(label: &str) -> Option<Self> {
        let upper = label.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|d| d.as_str() == upper)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s).ok_or_else(|| DomainError::InvalidDepartment(s.to_string()))
    }
}

/// Organizational rank inside the roster
///
/// Unrelated to Discord roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgRole {
    Member,
    CoreMember,
}

impl OrgRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "MEMBER",
            Self::CoreMember => "CORE_MEMBER",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::CoreMember => "Core Member",
        }
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrgRole {
    type Err = DomainError;

    /// Accepts both stored names ("CORE_MEMBER") and display names ("Core Member")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match key.as_str() {
            "MEMBER" => Ok(Self::Member),
            "CORE_MEMBER" => Ok(Self::CoreMember),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// A roster member as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Store-assigned identifier
    pub id: i64,
    /// Discord user id; the unique external identity of the member
    pub discord_id: Snowflake,
    pub name: String,
    pub email: Option<String>,
    /// Department label exactly as stored. Rows written through the service
    /// always hold a canonical name; older rows may not.
    pub department: String,
    pub role: OrgRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// The department this member's stored label normalizes to, if any
    pub fn department_kind(&self) -> Option<Department> {
        Department::normalize(&self.department)
    }
}

/// Validated input for creating or updating a member, keyed by `discord_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberUpsert {
    pub discord_id: Snowflake,
    pub name: String,
    pub email: Option<String>,
    pub department: Department,
    pub role: OrgRole,
}
