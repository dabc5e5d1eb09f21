//! Role-based authorization guards.
//!
//! Each guard reads the `SessionUser` that `auth_middleware` placed in the
//! request extensions and checks its role. Failing a role check answers
//! 401 Unauthorized, the same as a missing session.
//!
//! | Guard               | Roles                      |
//! |---------------------|----------------------------|
//! | `RequireAdmin`      | ADMIN                      |
//! | `RequireStaff`      | ADMIN, EDITOR, MODERATOR   |
//! | `RequireAdvertiser` | ADMIN, ADVERTISER          |

use crate::core::error::AppError;
use crate::features::auth::model::SessionUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn session_with<F>(parts: &Parts, allowed: F, message: &str) -> Result<SessionUser, AppError>
where
    F: Fn(&SessionUser) -> bool,
{
    let user = parts
        .extensions
        .get::<SessionUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    if !allowed(user) {
        tracing::warn!("User {} ({}) denied: {}", user.id, user.role, message);
        return Err(AppError::Unauthorized(message.to_string()));
    }

    Ok(user.clone())
}

/// Guard for admin-only operations.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub SessionUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_with(parts, SessionUser::is_admin, "Admin access required").map(RequireAdmin)
    }
}

/// Guard for moderation work: reports, comments, the dashboard.
pub struct RequireStaff(pub SessionUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_with(parts, SessionUser::is_staff, "Staff access required").map(RequireStaff)
    }
}

/// Guard for advertisement management.
pub struct RequireAdvertiser(pub SessionUser);

impl<S> FromRequestParts<S> for RequireAdvertiser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_with(parts, SessionUser::can_manage_ads, "Advertiser access required")
            .map(RequireAdvertiser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use axum::http::Request;
    use uuid::Uuid;

    fn parts_with(role: Option<UserRole>) -> Parts {
        let (mut parts, _) = Request::new(()).into_parts();
        if let Some(role) = role {
            parts.extensions.insert(SessionUser {
                id: Uuid::now_v7(),
                name: "Tester".to_string(),
                role,
            });
        }
        parts
    }

    #[tokio::test]
    async fn test_admin_guard() {
        let mut parts = parts_with(Some(UserRole::Admin));
        assert!(RequireAdmin::from_request_parts(&mut parts, &()).await.is_ok());

        let mut parts = parts_with(Some(UserRole::Moderator));
        let err = RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_staff_guard() {
        for role in [UserRole::Admin, UserRole::Editor, UserRole::Moderator] {
            let mut parts = parts_with(Some(role));
            assert!(RequireStaff::from_request_parts(&mut parts, &()).await.is_ok());
        }
        for role in [UserRole::User, UserRole::Advertiser] {
            let mut parts = parts_with(Some(role));
            assert!(RequireStaff::from_request_parts(&mut parts, &()).await.is_err());
        }
    }

    #[tokio::test]
    async fn test_guards_without_session() {
        let mut parts = parts_with(None);
        assert!(RequireAdvertiser::from_request_parts(&mut parts, &())
            .await
            .is_err());
    }
}
