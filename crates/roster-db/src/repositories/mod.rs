//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in roster-core.

mod admin;
mod error;
mod member;

pub use admin::PgAdminRepository;
pub use member::PgMemberRepository;
