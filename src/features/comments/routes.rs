use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

/// Approved comments under an article (no authentication required)
pub fn public_routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route("/api/posts/{id}/comments", get(handlers::list_post_comments))
        .with_state(service)
}

/// Commenting and moderation (require auth middleware to be applied by caller)
pub fn protected_routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route(
            "/api/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route("/api/comments/{id}", patch(handlers::moderate_comment))
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

    fn server_as(role: UserRole) -> axum_test::TestServer {
        let service = Arc::new(CommentService::new(lazy_test_pool()));
        test_server(with_session(protected_routes(service), session_user(role)))
    }

    #[tokio::test]
    async fn test_unknown_moderation_status_rejected() {
        let server = server_as(UserRole::Moderator);
        let response = server
            .patch(&format!("/api/comments/{}", Uuid::now_v7()))
            .json(&json!({ "status": "ARCHIVED" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_reader_cannot_moderate() {
        let server = server_as(UserRole::User);
        server
            .patch(&format!("/api/comments/{}", Uuid::now_v7()))
            .json(&json!({ "status": "APPROVED" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_advertiser_cannot_list_queue() {
        let server = server_as(UserRole::Advertiser);
        server
            .get("/api/comments")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_comment_rejected() {
        let server = server_as(UserRole::User);
        server
            .post("/api/comments")
            .json(&json!({ "postId": 1, "content": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
