use crate::features::users::handlers::{profile_handler, user_handler};
use crate::features::users::services::UserService;
use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

/// Account administration and the caller's own profile. Mounted behind auth.
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/users",
            get(user_handler::list_users).post(user_handler::create_user),
        )
        .route(
            "/api/users/{id}",
            patch(user_handler::update_user_role).delete(user_handler::delete_user),
        )
        .route(
            "/api/me/profile",
            get(profile_handler::get_profile).put(profile_handler::update_profile),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{session_user, test_server, with_session};
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    fn router_as(role: UserRole) -> (Router, Uuid) {
        let user = session_user(role);
        let id = user.id;
        let service = Arc::new(UserService::new(lazy_test_pool(), 4));
        (with_session(routes(service), user), id)
    }

    #[tokio::test]
    async fn test_non_admin_cannot_delete_user() {
        for role in [UserRole::User, UserRole::Moderator, UserRole::Editor, UserRole::Advertiser] {
            let (router, _) = router_as(role);
            let server = test_server(router);

            let response = server
                .delete(&format!("/api/users/{}", Uuid::now_v7()))
                .await;
            response.assert_status(StatusCode::UNAUTHORIZED);
            let body: serde_json::Value = response.json();
            assert_eq!(body["success"], false);
        }
    }

    #[tokio::test]
    async fn test_non_admin_cannot_change_role() {
        let (router, _) = router_as(UserRole::Moderator);
        let server = test_server(router);

        server
            .patch(&format!("/api/users/{}", Uuid::now_v7()))
            .json(&json!({ "role": "ADMIN" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_role_rejected() {
        let (router, _) = router_as(UserRole::Admin);
        let server = test_server(router);

        server
            .patch(&format!("/api/users/{}", Uuid::now_v7()))
            .json(&json!({ "role": "SUPERUSER" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let (router, admin_id) = router_as(UserRole::Admin);
        let server = test_server(router);

        server
            .delete(&format!("/api/users/{}", admin_id))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let service = Arc::new(UserService::new(lazy_test_pool(), 4));
        let server = test_server(routes(service));

        server
            .get("/api/me/profile")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
