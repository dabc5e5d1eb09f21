use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::SessionUser;
use crate::features::comments::dtos::{
    AdminCommentDto, CommentQueryParams, CommentResponseDto, CreateCommentDto,
    ModerateCommentDto, PublicCommentDto,
};
use crate::features::comments::services::CommentService;
use crate::shared::types::{ApiResponse, Meta};

/// Approved comments on an article
#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    params(
        ("id" = i64, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Approved comments", body = ApiResponse<Vec<PublicCommentDto>>)
    ),
    tag = "comments"
)]
pub async fn list_post_comments(
    State(service): State<Arc<CommentService>>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<PublicCommentDto>>>> {
    let comments = service.list_approved(post_id).await?;
    let dtos = comments.into_iter().map(PublicCommentDto::from).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Comment on a published article. The comment awaits moderation.
#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment submitted for moderation", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    tag = "comments",
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    user: SessionUser,
    State(service): State<Arc<CommentService>>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let comment = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(comment.into()),
            Some("Comment is awaiting moderation".to_string()),
            None,
        )),
    ))
}

/// Moderation queue (staff)
#[utoipa::path(
    get,
    path = "/api/comments",
    params(CommentQueryParams),
    responses(
        (status = 200, description = "List of comments", body = ApiResponse<Vec<AdminCommentDto>>),
        (status = 401, description = "Unauthorized - Staff access required")
    ),
    tag = "comments",
    security(("bearer_auth" = []))
)]
pub async fn list_comments(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<CommentService>>,
    Query(params): Query<CommentQueryParams>,
) -> Result<Json<ApiResponse<Vec<AdminCommentDto>>>> {
    let (comments, total) = service.list_all(&params).await?;
    let dtos = comments.into_iter().map(AdminCommentDto::from).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(Meta { total }))))
}

/// Approve or reject a comment (staff)
#[utoipa::path(
    patch,
    path = "/api/comments/{id}",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = ModerateCommentDto,
    responses(
        (status = 200, description = "Comment moderated", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Status must be APPROVED or REJECTED"),
        (status = 401, description = "Unauthorized - Staff access required"),
        (status = 404, description = "Comment not found")
    ),
    tag = "comments",
    security(("bearer_auth" = []))
)]
pub async fn moderate_comment(
    RequireStaff(staff): RequireStaff,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ModerateCommentDto>,
) -> Result<Json<ApiResponse<CommentResponseDto>>> {
    let comment = service.moderate(&staff, id, &dto.status).await?;
    Ok(Json(ApiResponse::success(Some(comment.into()), None, None)))
}
