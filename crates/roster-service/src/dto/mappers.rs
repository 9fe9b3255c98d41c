//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use roster_core::{AdminUser, Member};

use super::responses::{AdminResponse, MemberResponse};

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            discord_id: member.discord_id,
            name: member.name.clone(),
            email: member.email.clone(),
            department: member.department.clone(),
            department_name: member.department_kind().map(|d| d.display_name()),
            role: member.role,
            role_name: member.role.display_name(),
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self::from(&member)
    }
}

impl From<&AdminUser> for AdminResponse {
    fn from(admin: &AdminUser) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            created_at: admin.created_at,
        }
    }
}

impl From<AdminUser> for AdminResponse {
    fn from(admin: AdminUser) -> Self {
        Self::from(&admin)
    }
}
