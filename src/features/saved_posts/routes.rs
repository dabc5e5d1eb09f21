use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::saved_posts::handlers;
use crate::features::saved_posts::services::SavedPostService;

/// Saved posts of the signed-in reader (require auth middleware to be applied by caller)
pub fn routes(service: Arc<SavedPostService>) -> Router {
    Router::new()
        .route(
            "/api/saved-posts",
            get(handlers::list_saved_posts).post(handlers::save_post),
        )
        .route(
            "/api/saved-posts/{post_id}",
            get(handlers::check_saved_post).delete(handlers::unsave_post),
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

    fn service() -> Arc<SavedPostService> {
        Arc::new(SavedPostService::new(lazy_test_pool()))
    }

    #[tokio::test]
    async fn test_requires_session() {
        let server = test_server(routes(service()));

        server
            .get("/api/saved-posts")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .post("/api/saved-posts")
            .json(&json!({ "postId": 1 }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_numeric_post_id_rejected() {
        let server = test_server(with_session(routes(service()), session_user(UserRole::User)));

        server
            .delete("/api/saved-posts/abc")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
