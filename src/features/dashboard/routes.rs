use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Create dashboard routes (require auth middleware to be applied by caller)
pub fn routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/overview", get(handlers::get_overview))
        .with_state(dashboard_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{session_user, test_server, with_session};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_overview_is_staff_only() {
        for role in [UserRole::User, UserRole::Advertiser] {
            let service = Arc::new(DashboardService::new(lazy_test_pool()));
            let server = test_server(with_session(routes(service), session_user(role)));
            server
                .get("/api/dashboard/overview")
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        }
    }
}
