use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/otp", post(handlers::request_otp))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/google", post(handlers::google_login))
        .route("/api/auth/check-email", post(handlers::check_email))
        .with_state(service)
}

/// Protected auth routes (require a session token)
pub fn protected_routes() -> Router {
    Router::new().route("/api/auth/me", get(handlers::get_me))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{session_user, test_server, with_session};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_me_returns_session_claims() {
        let user = session_user(UserRole::Editor);
        let server = test_server(with_session(protected_routes(), user.clone()));

        let response = server.get("/api/auth/me").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["id"], user.id.to_string());
        assert_eq!(body["data"]["role"], "EDITOR");
    }

    #[tokio::test]
    async fn test_me_without_session() {
        let server = test_server(protected_routes());
        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
