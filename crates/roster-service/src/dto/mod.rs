//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs
//! - The tab-separated roster table parser used by the text import

pub mod mappers;
pub mod requests;
pub mod responses;
pub mod table;

pub use requests::{
    DeleteMemberRequest, LoginRequest, SingleRoleRequest, SyncRolesRequest, UpsertMemberRequest,
};

pub use responses::{
    AdminResponse, HealthChecks, HealthResponse, ImportResponse, LoginResponse, MemberResponse,
    ReadinessResponse, SingleAssignResponse,
};

pub use table::{parse_roster_table, TableRow};
