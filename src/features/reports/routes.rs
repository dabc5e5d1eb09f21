use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Report filing and moderation (require auth middleware to be applied by caller)
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report).patch(handlers::resolve_report),
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

    fn server_as(role: UserRole) -> axum_test::TestServer {
        let service = Arc::new(ReportService::new(lazy_test_pool()));
        test_server(with_session(routes(service), session_user(role)))
    }

    #[tokio::test]
    async fn test_blank_reason_rejected() {
        let server = server_as(UserRole::User);
        let response = server
            .post("/api/reports")
            .json(&json!({ "postId": 1, "reason": "   " }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_report_needs_exactly_one_target() {
        let server = server_as(UserRole::User);
        server
            .post("/api/reports")
            .json(&json!({ "postId": 1, "commentId": Uuid::now_v7(), "reason": "spam" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/reports")
            .json(&json!({ "reason": "spam" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_foreign_reporter_id_rejected() {
        let server = server_as(UserRole::User);
        server
            .post("/api/reports")
            .json(&json!({ "postId": 1, "reason": "spam", "reporterId": Uuid::now_v7() }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_reader_cannot_resolve() {
        let server = server_as(UserRole::User);
        server
            .patch(&format!("/api/reports/{}", Uuid::now_v7()))
            .json(&json!({ "status": "ACCEPTED", "hideContent": true }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_resolution_status_rejected() {
        let server = server_as(UserRole::Moderator);
        server
            .patch(&format!("/api/reports/{}", Uuid::now_v7()))
            .json(&json!({ "status": "CLOSED" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_advertiser_cannot_list() {
        let server = server_as(UserRole::Advertiser);
        server
            .get("/api/reports")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
