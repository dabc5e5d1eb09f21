use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Account role matching the `user_role` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Editor,
    Moderator,
    Advertiser,
    Admin,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        self == UserRole::Admin
    }

    /// Admins, editors and moderators can act on reports, comments and the dashboard
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Editor | UserRole::Moderator)
    }

    pub fn can_manage_ads(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Advertiser)
    }

    /// Editors and admins can publish, archive and edit other people's posts
    pub fn can_publish(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Editor)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "USER"),
            UserRole::Editor => write!(f, "EDITOR"),
            UserRole::Moderator => write!(f, "MODERATOR"),
            UserRole::Advertiser => write!(f, "ADVERTISER"),
            UserRole::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(UserRole::User),
            "EDITOR" => Ok(UserRole::Editor),
            "MODERATOR" => Ok(UserRole::Moderator),
            "ADVERTISER" => Ok(UserRole::Advertiser),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(AppError::BadRequest(format!("Invalid role: {}", other))),
        }
    }
}

/// Database model for an account
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a new account
#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub google_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_predicates() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Editor.is_staff());
        assert!(UserRole::Moderator.is_staff());
        assert!(!UserRole::Advertiser.is_staff());
        assert!(!UserRole::User.is_staff());

        assert!(UserRole::Advertiser.can_manage_ads());
        assert!(UserRole::Admin.can_manage_ads());
        assert!(!UserRole::Moderator.can_manage_ads());

        assert!(UserRole::Editor.can_publish());
        assert!(!UserRole::Moderator.can_publish());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("MODERATOR".parse::<UserRole>().unwrap(), UserRole::Moderator);
        assert_eq!(UserRole::Advertiser.to_string(), "ADVERTISER");
        assert!("admin".parse::<UserRole>().is_err());
        assert!("SUPERUSER".parse::<UserRole>().is_err());
    }
}
