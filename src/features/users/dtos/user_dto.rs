use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{Gender, ProfileView, User, UserRole};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::PHONE_REGEX;

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

/// Query params for the admin user list
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct UserQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Case-insensitive match on name or email
    pub search: Option<String>,
    pub role: Option<UserRole>,
}

impl UserQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Request DTO for an admin creating an account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::User
}

/// Request DTO for changing an account's role
///
/// The role arrives as a plain string so an unknown value is reported as 400
/// with the offending value rather than a generic JSON error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateRoleDto {
    #[schema(example = "MODERATOR")]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponseDto {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ProfileView> for ProfileResponseDto {
    fn from(p: ProfileView) -> Self {
        Self {
            user_id: p.user_id,
            name: p.name,
            email: p.email,
            avatar: p.avatar,
            gender: p.gender,
            address: p.address,
            phone: p.phone,
            birth_date: p.birth_date,
            updated_at: p.updated_at,
        }
    }
}

/// Request DTO for updating the caller's own profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar: Option<String>,

    pub gender: Option<Gender>,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,

    #[validate(regex(
        path = *PHONE_REGEX,
        message = "Phone must be 8-15 digits, optionally starting with +"
    ))]
    pub phone: Option<String>,

    pub birth_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_validation() {
        let dto: UpdateProfileDto = serde_json::from_value(serde_json::json!({
            "name": "Nguyễn Văn A",
            "phone": "+84901234567",
            "birthDate": "1995-04-30",
            "gender": "MALE"
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let dto: UpdateProfileDto = serde_json::from_value(serde_json::json!({
            "phone": "call me"
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_user_defaults_to_user_role() {
        let dto: CreateUserDto = serde_json::from_value(serde_json::json!({
            "name": "Biên tập viên",
            "email": "editor@example.com",
            "password": "secret-pass"
        }))
        .unwrap();
        assert_eq!(dto.role, UserRole::User);
        assert!(dto.validate().is_ok());
    }
}
