//! AdminUser entity <-> model mapper

use roster_core::entities::AdminUser;

use crate::models::AdminUserModel;

impl From<AdminUserModel> for AdminUser {
    fn from(model: AdminUserModel) -> Self {
        admin_with_hash(model).0
    }
}

/// Split a row into the public entity and its password hash
pub fn admin_with_hash(model: AdminUserModel) -> (AdminUser, String) {
    let AdminUserModel {
        id,
        email,
        password_hash,
        created_at,
    } = model;

    (
        AdminUser {
            id,
            email,
            created_at,
        },
        password_hash,
    )
}
