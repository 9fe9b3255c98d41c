//! Discord wire types
//!
//! Only the fields this service reads or writes are modelled. Ids travel as
//! JSON strings.

use roster_core::{GuildMemberSnapshot, Snowflake};
use serde::{Deserialize, Serialize};

/// Partial Discord user object
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: Snowflake,
    #[serde(default)]
    pub username: Option<String>,
}

/// Partial Discord guild member object
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordMember {
    pub user: DiscordUser,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

impl From<DiscordMember> for GuildMemberSnapshot {
    fn from(member: DiscordMember) -> Self {
        GuildMemberSnapshot::new(member.user.id, member.roles)
    }
}

/// Body of `PATCH guilds/{guild}/members/{user}`
#[derive(Debug, Serialize)]
pub struct ModifyMemberRoles<'a> {
    pub roles: &'a [Snowflake],
}

/// Body of `PATCH webhooks/{application}/{token}`
#[derive(Debug, Serialize)]
pub struct InteractionEdit<'a> {
    #[serde(rename = "type")]
    pub kind: u8,
    pub data: InteractionEditData<'a>,
}

#[derive(Debug, Serialize)]
pub struct InteractionEditData<'a> {
    pub content: &'a str,
}

impl<'a> InteractionEdit<'a> {
    /// Deferred update message (`type` 6) carrying the new content
    pub const DEFERRED_UPDATE_MESSAGE: u8 = 6;

    pub fn new(content: &'a str) -> Self {
        Self {
            kind: Self::DEFERRED_UPDATE_MESSAGE,
            data: InteractionEditData { content },
        }
    }
}
