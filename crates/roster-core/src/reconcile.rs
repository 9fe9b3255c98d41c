//! Role reconciliation planning
//!
//! Decides, for one roster member, which Discord role changes bring the guild
//! member in line with the roster department. After the plan is applied the
//! member's held roles intersected with the department roles are exactly the
//! desired role.

use std::collections::HashMap;

use crate::entities::{GuildMemberSnapshot, Member};
use crate::value_objects::{DepartmentRoleMap, Snowflake};

/// What to do for a single roster member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberPlan {
    /// No guild member shares the roster member's Discord id
    NotInGuild,
    /// The stored department does not name a known department
    InvalidDepartment { department: String },
    /// Desired role already held; nothing to do
    AlreadyInSync { role: Snowflake },
    /// Remove the conflicting department roles (in order), then add `add`
    Converge { remove: Vec<Snowflake>, add: Snowflake },
}

impl MemberPlan {
    /// Number of platform calls applying this plan takes
    pub fn call_count(&self) -> usize {
        match self {
            Self::Converge { remove, .. } => remove.len() + 1,
            _ => 0,
        }
    }
}

/// Index a guild member listing by user id
pub fn index_guild_members(
    members: &[GuildMemberSnapshot],
) -> HashMap<Snowflake, &GuildMemberSnapshot> {
    members.iter().map(|m| (m.user_id, m)).collect()
}

/// Plan the role changes for one member
///
/// A member already holding the desired role is left alone, even if it also
/// holds other department roles.
pub fn plan(
    member: &Member,
    guild_member: Option<&GuildMemberSnapshot>,
    roles: &DepartmentRoleMap,
) -> MemberPlan {
    let Some(guild_member) = guild_member else {
        return MemberPlan::NotInGuild;
    };

    let Some(department) = member.department_kind() else {
        return MemberPlan::InvalidDepartment {
            department: member.department.clone(),
        };
    };

    let desired = roles.role_for(department);
    if guild_member.has_role(desired) {
        return MemberPlan::AlreadyInSync { role: desired };
    }

    let mut remove: Vec<Snowflake> = Vec::new();
    for &held in &guild_member.roles {
        if held != desired && roles.is_department_role(held) && !remove.contains(&held) {
            remove.push(held);
        }
    }

    MemberPlan::Converge {
        remove,
        add: desired,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entities::OrgRole;

    const TECHNICAL: i64 = 1_292_540_786_759_700_623;
    const DESIGN: i64 = 1_292_540_869_433_491_466;
    const MARKETING: i64 = 1_292_540_932_054_585_384;
    const MANAGEMENT: i64 = 1_292_540_937_653_715_088;
    const UNRELATED: i64 = 999;

    fn role_map() -> DepartmentRoleMap {
        DepartmentRoleMap::new(
            Snowflake::new(TECHNICAL),
            Snowflake::new(DESIGN),
            Snowflake::new(MARKETING),
            Snowflake::new(MANAGEMENT),
        )
        .unwrap()
    }

    fn member(discord_id: i64, department: &str) -> Member {
        let now = Utc::now();
        Member {
            id: discord_id,
            discord_id: Snowflake::new(discord_id),
            name: format!("member-{discord_id}"),
            email: None,
            department: department.to_string(),
            role: OrgRole::Member,
            created_at: now,
            updated_at: now,
        }
    }

    fn guild_member(user_id: i64, roles: &[i64]) -> GuildMemberSnapshot {
        GuildMemberSnapshot::new(
            Snowflake::new(user_id),
            roles.iter().copied().map(Snowflake::new).collect(),
        )
    }

    #[test]
    fn test_not_in_guild() {
        let plan = plan(&member(1, "DESIGN"), None, &role_map());
        assert_eq!(plan, MemberPlan::NotInGuild);
        assert_eq!(plan.call_count(), 0);
    }

    #[test]
    fn test_invalid_department() {
        let gm = guild_member(1, &[]);
        let plan = plan(&member(1, "Finance"), Some(&gm), &role_map());
        assert_eq!(
            plan,
            MemberPlan::InvalidDepartment {
                department: "Finance".to_string()
            }
        );
    }

    #[test]
    fn test_already_in_sync() {
        let gm = guild_member(1, &[UNRELATED, DESIGN]);
        let plan = plan(&member(1, "DESIGN"), Some(&gm), &role_map());
        assert_eq!(
            plan,
            MemberPlan::AlreadyInSync {
                role: Snowflake::new(DESIGN)
            }
        );
    }

    #[test]
    fn test_add_only_when_no_department_role_held() {
        let gm = guild_member(1, &[UNRELATED]);
        let plan = plan(&member(1, "MARKETING"), Some(&gm), &role_map());
        assert_eq!(
            plan,
            MemberPlan::Converge {
                remove: vec![],
                add: Snowflake::new(MARKETING)
            }
        );
        assert_eq!(plan.call_count(), 1);
    }

    #[test]
    fn test_replaces_other_department_roles() {
        let gm = guild_member(1, &[TECHNICAL, UNRELATED, MANAGEMENT]);
        let plan = plan(&member(1, "DESIGN"), Some(&gm), &role_map());
        assert_eq!(
            plan,
            MemberPlan::Converge {
                remove: vec![Snowflake::new(TECHNICAL), Snowflake::new(MANAGEMENT)],
                add: Snowflake::new(DESIGN)
            }
        );
        assert_eq!(plan.call_count(), 3);
    }

    #[test]
    fn test_lowercase_department_maps_like_uppercase() {
        let gm = guild_member(1, &[]);
        let lower = plan(&member(1, "technical"), Some(&gm), &role_map());
        let upper = plan(&member(1, "TECHNICAL"), Some(&gm), &role_map());
        assert_eq!(lower, upper);
        assert_eq!(
            lower,
            MemberPlan::Converge {
                remove: vec![],
                add: Snowflake::new(TECHNICAL)
            }
        );
    }

    #[test]
    fn test_index_guild_members() {
        let members = vec![guild_member(1, &[]), guild_member(2, &[DESIGN])];
        let index = index_guild_members(&members);
        assert_eq!(index.len(), 2);
        assert!(index[&Snowflake::new(2)].has_role(Snowflake::new(DESIGN)));
        assert!(!index.contains_key(&Snowflake::new(3)));
    }
}
