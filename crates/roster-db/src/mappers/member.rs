//! Member entity <-> model mapper

use roster_core::entities::{Member, MemberUpsert, OrgRole};
use roster_core::error::DomainError;
use roster_core::value_objects::Snowflake;

use crate::models::MemberModel;

/// Convert a row into a Member entity
///
/// The department label is carried through untouched. The role column is
/// constrained by the schema, so an unknown value means a corrupt row.
impl TryFrom<MemberModel> for Member {
    type Error = DomainError;

    fn try_from(model: MemberModel) -> Result<Self, Self::Error> {
        let role: OrgRole = model.role.parse().map_err(|_| {
            DomainError::DatabaseError(format!(
                "member {} has unknown role '{}'",
                model.id, model.role
            ))
        })?;

        Ok(Member {
            id: model.id,
            discord_id: Snowflake::new(model.discord_id),
            name: model.name,
            email: model.email,
            department: model.department,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Column values for an insert-or-update
pub struct MemberWrite<'a> {
    pub discord_id: i64,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub department: &'static str,
    pub role: &'static str,
}

impl<'a> MemberWrite<'a> {
    pub fn new(member: &'a MemberUpsert) -> Self {
        Self {
            discord_id: member.discord_id.into_inner(),
            name: &member.name,
            email: member.email.as_deref(),
            department: member.department.as_str(),
            role: member.role.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use roster_core::entities::Department;

    use super::*;

    fn model(department: &str, role: &str) -> MemberModel {
        MemberModel {
            id: 3,
            discord_id: 1_157_645_390_123_456_789,
            name: "Grace".to_string(),
            email: Some("grace@example.com".to_string()),
            department: department.to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_entity() {
        let member = Member::try_from(model("DESIGN", "CORE_MEMBER")).unwrap();
        assert_eq!(member.discord_id, Snowflake::new(1_157_645_390_123_456_789));
        assert_eq!(member.role, OrgRole::CoreMember);
        assert_eq!(member.department_kind(), Some(Department::Design));
    }

    #[test]
    fn test_unknown_department_is_kept() {
        let member = Member::try_from(model("Finance", "MEMBER")).unwrap();
        assert_eq!(member.department, "Finance");
        assert_eq!(member.department_kind(), None);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = Member::try_from(model("DESIGN", "OWNER")).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }

    #[test]
    fn test_write_uses_canonical_names() {
        let upsert = MemberUpsert {
            discord_id: Snowflake::new(7),
            name: "Linus".to_string(),
            email: None,
            department: Department::Technical,
            role: OrgRole::Member,
        };
        let write = MemberWrite::new(&upsert);
        assert_eq!(write.discord_id, 7);
        assert_eq!(write.department, "TECHNICAL");
        assert_eq!(write.role, "MEMBER");
        assert!(write.email.is_none());
    }
}
