use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::users::models::UserRole;

/// Caller identity decoded from a verified session token
///
/// The role is taken from the token as issued; it is not re-read from the
/// database on each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn can_manage_ads(&self) -> bool {
        self.role.can_manage_ads()
    }

    pub fn can_publish(&self) -> bool {
        self.role.can_publish()
    }
}
