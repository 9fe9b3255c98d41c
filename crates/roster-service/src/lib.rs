//! # roster-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use services::{
    AuthService, MemberService, RoleSyncService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SyncReport, SyncSettings,
};
