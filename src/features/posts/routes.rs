use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::categories::CategoryService;
use crate::features::posts::handlers::{self, PostState};
use crate::features::posts::services::PostService;

/// Reader-facing routes. Mounted with optional auth so authors and staff
/// can preview unpublished posts.
pub fn public_routes(post_service: Arc<PostService>, category_service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/posts/latest", get(handlers::latest_posts))
        .route("/api/posts/{id}", get(handlers::get_post))
        .route("/api/categories/{name}/posts", get(handlers::posts_by_category))
        .with_state(PostState {
            post_service,
            category_service,
        })
}

/// Authoring and staff routes (require auth middleware to be applied by caller)
pub fn protected_routes(
    post_service: Arc<PostService>,
    category_service: Arc<CategoryService>,
) -> Router {
    Router::new()
        .route("/api/posts", post(handlers::create_post))
        .route("/api/posts/{id}", put(handlers::update_post))
        .route("/api/admin/posts", get(handlers::list_all_posts))
        .with_state(PostState {
            post_service,
            category_service,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{session_user, test_server, with_session};
    use axum::http::StatusCode;
    use serde_json::json;

    fn protected_as(role: UserRole) -> Router {
        let pool = lazy_test_pool();
        with_session(
            protected_routes(
                Arc::new(PostService::new(pool.clone())),
                Arc::new(CategoryService::new(pool)),
            ),
            session_user(role),
        )
    }

    #[tokio::test]
    async fn test_reader_cannot_list_all_posts() {
        let server = test_server(protected_as(UserRole::User));
        server
            .get("/api/admin/posts")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_post_requires_title() {
        let server = test_server(protected_as(UserRole::User));
        server
            .post("/api/posts")
            .json(&json!({ "title": "", "content": "<p>Nội dung</p>" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_post_cannot_self_publish() {
        let server = test_server(protected_as(UserRole::User));
        server
            .post("/api/posts")
            .json(&json!({
                "title": "Tin nóng",
                "content": "<p>Nội dung</p>",
                "status": "PUBLISHED"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
