//! Entity to model mappers
//!
//! - `TryFrom<Model>`/`From<Model>` for entities: database rows to domain objects
//! - `MemberWrite`: entity data prepared for binding

mod admin;
mod member;

pub use admin::admin_with_hash;
pub use member::MemberWrite;
