//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod auth;
pub mod context;
pub mod error;
pub mod member;
pub mod role_sync;

// Re-export all services for convenience
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder, SyncSettings};
pub use error::{ServiceError, ServiceResult};
pub use member::MemberService;
pub use role_sync::{
    MemberOutcome, RoleSyncService, SyncCounts, SyncOutcome, SyncReport, INTERACTION_REPLY,
};
