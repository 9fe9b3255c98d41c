//! # roster-core
//!
//! Domain layer containing roster entities, the department → Discord role mapping,
//! the reconciliation planner, and the ports implemented by infrastructure crates.
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod reconcile;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{AdminUser, Department, GuildMemberSnapshot, Member, MemberUpsert, OrgRole};
pub use error::DomainError;
pub use reconcile::{index_guild_members, plan, MemberPlan};
pub use traits::{AdminRepository, GuildGateway, MemberRepository, RepoResult};
pub use value_objects::{
    is_valid_interaction_token, DepartmentRoleMap, Snowflake, SnowflakeParseError,
};
