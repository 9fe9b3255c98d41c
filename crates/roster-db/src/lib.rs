//! # roster-db
//!
//! Database layer implementing the roster-core repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roster_db::{create_pool, migrations_dir, run_migrations, PgMemberRepository, PoolConfig};
//! use roster_core::traits::MemberRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/roster")).await?;
//!     run_migrations(&pool, &migrations_dir()).await?;
//!
//!     let members = PgMemberRepository::new(pool).list().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, migrations_dir, ping, run_migrations, PgPool, PoolConfig};
pub use repositories::{PgAdminRepository, PgMemberRepository};
