//! Domain entities - core business objects

mod admin;
mod guild_member;
mod member;

pub use admin::AdminUser;
pub use guild_member::GuildMemberSnapshot;
pub use member::{Department, Member, MemberUpsert, OrgRole};
