use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::advertisements::handlers::{self, AdState};
use crate::features::advertisements::services::{AdMetricService, AdvertisementService};

/// Ad serving and tracking beacons (no authentication required)
pub fn public_routes(
    ad_service: Arc<AdvertisementService>,
    metric_service: Arc<AdMetricService>,
) -> Router {
    Router::new()
        .route(
            "/api/advertisements/placement",
            get(handlers::advertisement_placement),
        )
        .route("/api/ad-metrics/impression", post(handlers::record_impression))
        .route("/api/ad-metrics/click", post(handlers::record_click))
        .with_state(AdState {
            ad_service,
            metric_service,
        })
}

/// Campaign management (require auth middleware to be applied by caller)
pub fn protected_routes(
    ad_service: Arc<AdvertisementService>,
    metric_service: Arc<AdMetricService>,
) -> Router {
    Router::new()
        .route(
            "/api/advertisements",
            get(handlers::list_advertisements).post(handlers::create_advertisement),
        )
        .route(
            "/api/advertisements/{id}/status",
            patch(handlers::update_advertisement_status),
        )
        .route(
            "/api/advertisements/{id}/stats",
            get(handlers::advertisement_stats),
        )
        .with_state(AdState {
            ad_service,
            metric_service,
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
    use uuid::Uuid;

    fn services() -> (Arc<AdvertisementService>, Arc<AdMetricService>) {
        let pool = lazy_test_pool();
        (
            Arc::new(AdvertisementService::new(pool.clone())),
            Arc::new(AdMetricService::new(pool)),
        )
    }

    fn protected_as(role: UserRole) -> axum_test::TestServer {
        let (ads, metrics) = services();
        test_server(with_session(protected_routes(ads, metrics), session_user(role)))
    }

    #[tokio::test]
    async fn test_metric_requires_valid_ad_id() {
        let (ads, metrics) = services();
        let server = test_server(public_routes(ads, metrics));

        server
            .post("/api/ad-metrics/impression")
            .json(&json!({}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/api/ad-metrics/click")
            .json(&json!({ "adId": "not-a-uuid" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reader_cannot_manage_ads() {
        let server = protected_as(UserRole::User);
        server
            .get("/api/advertisements")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get(&format!("/api/advertisements/{}/stats", Uuid::now_v7()))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_moderator_cannot_create_ad() {
        let server = protected_as(UserRole::Moderator);
        server
            .post("/api/advertisements")
            .json(&json!({
                "title": "Banner",
                "imageUrl": "https://cdn.example.com/a.png",
                "targetUrl": "https://example.com",
                "position": "top",
                "displayPlace": "home"
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_ad_rejected() {
        let server = protected_as(UserRole::Advertiser);
        server
            .post("/api/advertisements")
            .json(&json!({
                "title": "Banner",
                "imageUrl": "https://cdn.example.com/a.png",
                "targetUrl": "nowhere",
                "position": "top",
                "displayPlace": "home"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pending_is_not_a_settable_status() {
        let server = protected_as(UserRole::Admin);
        server
            .patch(&format!("/api/advertisements/{}/status", Uuid::now_v7()))
            .json(&json!({ "status": "PENDING" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
