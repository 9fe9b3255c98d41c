//! Guild member snapshot - Discord's view of a user in a guild
//!
//! Owned by Discord; the roster only reads snapshots and issues partial updates.

use crate::value_objects::Snowflake;

/// A guild member and the roles it currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMemberSnapshot {
    pub user_id: Snowflake,
    pub roles: Vec<Snowflake>,
}

impl GuildMemberSnapshot {
    pub fn new(user_id: Snowflake, roles: Vec<Snowflake>) -> Self {
        Self { user_id, roles }
    }

    /// Check if member holds a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.roles.contains(&role_id)
    }

    /// Role set with `role_id` added; order kept, no duplicates
    pub fn roles_with(&self, role_id: Snowflake) -> Vec<Snowflake> {
        let mut roles = Vec::with_capacity(self.roles.len() + 1);
        for role in self.roles.iter().copied().chain(std::iter::once(role_id)) {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        roles
    }

    /// Role set with every occurrence of `role_id` removed
    pub fn roles_without(&self, role_id: Snowflake) -> Vec<Snowflake> {
        self.roles.iter().copied().filter(|&r| r != role_id).collect()
    }
}
