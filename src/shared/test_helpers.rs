use axum::{extract::Request, middleware::Next, Router};
use axum_test::TestServer;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::auth::model::SessionUser;
use crate::features::users::models::UserRole;

pub fn session_user(role: UserRole) -> SessionUser {
    SessionUser {
        id: Uuid::now_v7(),
        name: Name().fake(),
        role,
    }
}

/// Inject `user` as the authenticated caller, standing in for `auth_middleware`
pub fn with_session(router: Router, user: SessionUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

pub fn test_server(router: Router) -> TestServer {
    TestServer::new(router).expect("test server")
}

/// Insert a user with `role` and return it as a signed-in caller
pub async fn seed_user(pool: &PgPool, role: UserRole) -> SessionUser {
    let user = session_user(role);
    let email: String = SafeEmail().fake();
    sqlx::query("INSERT INTO users (id, name, email, role) VALUES ($1, $2, $3, $4)")
        .bind(user.id)
        .bind(&user.name)
        .bind(format!("{}.{}", user.id.simple(), email))
        .bind(user.role)
        .execute(pool)
        .await
        .expect("seed user");
    user
}

/// Insert a post in `status` ("DRAFT", "PUBLISHED", ...) and return its id
pub async fn seed_post(pool: &PgPool, author_id: Uuid, status: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO posts (title, content, status, author_id)
        VALUES ('Bão số 3 đổ bộ', 'Nội dung bài viết', $1::post_status, $2)
        RETURNING id
        "#,
    )
    .bind(status)
    .bind(author_id)
    .fetch_one(pool)
    .await
    .expect("seed post")
}

/// Insert a comment in `status` ("PENDING", "APPROVED", ...) and return its id
pub async fn seed_comment(pool: &PgPool, post_id: i64, author_id: Uuid, status: &str) -> Uuid {
    let id = Uuid::now_v7();
    sqlx::query(
        r#"
        INSERT INTO comments (id, content, status, author_id, post_id)
        VALUES ($1, 'Bình luận', $2::comment_status, $3, $4)
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(author_id)
    .bind(post_id)
    .execute(pool)
    .await
    .expect("seed comment");
    id
}
