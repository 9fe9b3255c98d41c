//! Value objects - immutable domain primitives

mod department_roles;
mod interaction_token;
mod snowflake;

pub use department_roles::DepartmentRoleMap;
pub use interaction_token::is_valid_interaction_token;
pub use snowflake::{Snowflake, SnowflakeParseError};
