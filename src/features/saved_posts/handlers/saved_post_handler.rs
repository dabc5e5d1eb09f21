use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::SessionUser;
use crate::features::saved_posts::dtos::{SavePostDto, SavedPostDto, SavedStatusDto};
use crate::features::saved_posts::models::SaveOutcome;
use crate::features::saved_posts::services::SavedPostService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List the caller's saved posts
#[utoipa::path(
    get,
    path = "/api/saved-posts",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Saved posts", body = ApiResponse<Vec<SavedPostDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "saved-posts",
    security(("bearer_auth" = []))
)]
pub async fn list_saved_posts(
    user: SessionUser,
    State(service): State<Arc<SavedPostService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<SavedPostDto>>>> {
    let (posts, total) = service.list(user.id, &pagination).await?;
    let dtos = posts.into_iter().map(SavedPostDto::from).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(Meta { total }))))
}

/// Save a post. Saving twice is not an error.
#[utoipa::path(
    post,
    path = "/api/saved-posts",
    request_body = SavePostDto,
    responses(
        (status = 201, description = "Post saved", body = ApiResponse<SavedStatusDto>),
        (status = 200, description = "Post was already saved", body = ApiResponse<SavedStatusDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    tag = "saved-posts",
    security(("bearer_auth" = []))
)]
pub async fn save_post(
    user: SessionUser,
    State(service): State<Arc<SavedPostService>>,
    AppJson(dto): AppJson<SavePostDto>,
) -> Result<(StatusCode, Json<ApiResponse<SavedStatusDto>>)> {
    let (status, message) = match service.save(user.id, dto.post_id).await? {
        SaveOutcome::Created => (StatusCode::CREATED, "Post saved"),
        SaveOutcome::AlreadySaved => (StatusCode::OK, "Post was already saved"),
    };
    Ok((
        status,
        Json(ApiResponse::success(
            Some(SavedStatusDto { saved: true }),
            Some(message.to_string()),
            None,
        )),
    ))
}

/// Remove a post from the caller's saved posts
#[utoipa::path(
    delete,
    path = "/api/saved-posts/{post_id}",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post removed from saved posts"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post is not saved")
    ),
    tag = "saved-posts",
    security(("bearer_auth" = []))
)]
pub async fn unsave_post(
    user: SessionUser,
    State(service): State<Arc<SavedPostService>>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<SavedStatusDto>>> {
    service.unsave(user.id, post_id).await?;
    Ok(Json(ApiResponse::success(
        Some(SavedStatusDto { saved: false }),
        None,
        None,
    )))
}

/// Whether the caller has saved a post
#[utoipa::path(
    get,
    path = "/api/saved-posts/{post_id}",
    params(
        ("post_id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Saved flag", body = ApiResponse<SavedStatusDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "saved-posts",
    security(("bearer_auth" = []))
)]
pub async fn check_saved_post(
    user: SessionUser,
    State(service): State<Arc<SavedPostService>>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<SavedStatusDto>>> {
    let saved = service.is_saved(user.id, post_id).await?;
    Ok(Json(ApiResponse::success(
        Some(SavedStatusDto { saved }),
        None,
        None,
    )))
}
