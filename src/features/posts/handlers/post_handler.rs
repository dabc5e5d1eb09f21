use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::SessionUser;
use crate::features::categories::CategoryService;
use crate::features::posts::dtos::{
    CreatePostDto, PostQueryParams, PostResponseDto, PostSummaryDto, UpdatePostDto,
};
use crate::features::posts::services::PostService;
use crate::shared::constants::LATEST_POSTS_LIMIT;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// State for post handlers
#[derive(Clone)]
pub struct PostState {
    pub post_service: Arc<PostService>,
    pub category_service: Arc<CategoryService>,
}

/// Latest published articles
#[utoipa::path(
    get,
    path = "/api/posts/latest",
    responses(
        (status = 200, description = "Newest published posts", body = ApiResponse<Vec<PostSummaryDto>>)
    ),
    tag = "posts"
)]
pub async fn latest_posts(
    State(state): State<PostState>,
) -> Result<Json<ApiResponse<Vec<PostSummaryDto>>>> {
    let posts = state.post_service.latest(LATEST_POSTS_LIMIT).await?;
    let dtos = posts.into_iter().map(PostSummaryDto::from).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Get one article
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(
        ("id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post found", body = ApiResponse<PostResponseDto>),
        (status = 404, description = "Post not found or not published")
    ),
    tag = "posts"
)]
pub async fn get_post(
    viewer: Option<SessionUser>,
    State(state): State<PostState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PostResponseDto>>> {
    let post = state.post_service.get(id, viewer.as_ref()).await?;
    Ok(Json(ApiResponse::success(Some(post), None, None)))
}

/// Published articles in a category, newest first
#[utoipa::path(
    get,
    path = "/api/categories/{name}/posts",
    params(
        ("name" = String, Path, description = "Category name or slug"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Posts in category", body = ApiResponse<Vec<PostSummaryDto>>),
        (status = 404, description = "Category not found")
    ),
    tag = "posts"
)]
pub async fn posts_by_category(
    State(state): State<PostState>,
    Path(name): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PostSummaryDto>>>> {
    let category = state.category_service.get_by_name(&name).await?;
    let (posts, total) = state
        .post_service
        .list_by_category(category.id, &pagination)
        .await?;
    let dtos = posts.into_iter().map(PostSummaryDto::from).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(Meta { total }))))
}

/// Submit an article
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = ApiResponse<PostResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "posts",
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    user: SessionUser,
    State(state): State<PostState>,
    AppJson(dto): AppJson<CreatePostDto>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let post = state.post_service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(post), None, None)),
    ))
}

/// Edit an article (author, editor or admin)
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(
        ("id" = i64, Path, description = "Post ID")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = ApiResponse<PostResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not allowed to edit this post"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts",
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    user: SessionUser,
    State(state): State<PostState>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdatePostDto>,
) -> Result<Json<ApiResponse<PostResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let post = state.post_service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(post),
        Some("Post updated".to_string()),
        None,
    )))
}

/// All articles in any status (staff)
#[utoipa::path(
    get,
    path = "/api/admin/posts",
    params(PostQueryParams),
    responses(
        (status = 200, description = "List of posts", body = ApiResponse<Vec<PostSummaryDto>>),
        (status = 401, description = "Unauthorized - Staff access required")
    ),
    tag = "posts",
    security(("bearer_auth" = []))
)]
pub async fn list_all_posts(
    RequireStaff(_staff): RequireStaff,
    State(state): State<PostState>,
    Query(params): Query<PostQueryParams>,
) -> Result<Json<ApiResponse<Vec<PostSummaryDto>>>> {
    let (posts, total) = state.post_service.list_all(&params).await?;
    let dtos = posts.into_iter().map(PostSummaryDto::from).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(Meta { total }))))
}
