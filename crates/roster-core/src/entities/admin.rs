//! Admin user entity - an account allowed to log in and edit the roster

use chrono::{DateTime, Utc};

/// Admin account (password hash is kept out of the entity)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
