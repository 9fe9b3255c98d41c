//! Database models - SQLx-compatible structs for PostgreSQL tables

mod admin;
mod member;

pub use admin::AdminUserModel;
pub use member::MemberModel;
