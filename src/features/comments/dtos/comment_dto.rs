use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::comments::models::{
    Comment, CommentStatus, CommentWithContext, PublicComment,
};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub content: String,
    pub status: CommentStatus,
    pub author_id: Uuid,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponseDto {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            content: c.content,
            status: c.status,
            author_id: c.author_id,
            post_id: c.post_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicCommentDto {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PublicComment> for PublicCommentDto {
    fn from(c: PublicComment) -> Self {
        Self {
            id: c.id,
            content: c.content,
            author_id: c.author_id,
            author_name: c.author_name,
            author_avatar: c.author_avatar,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCommentDto {
    pub id: Uuid,
    pub content: String,
    pub status: CommentStatus,
    pub author_id: Uuid,
    pub author_name: String,
    pub post_id: i64,
    pub post_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentWithContext> for AdminCommentDto {
    fn from(c: CommentWithContext) -> Self {
        Self {
            id: c.id,
            content: c.content,
            status: c.status,
            author_id: c.author_id,
            author_name: c.author_name,
            post_id: c.post_id,
            post_title: c.post_title,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Request DTO for commenting on an article
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentDto {
    pub post_id: i64,

    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

/// Request DTO for a moderation decision
///
/// Kept as a string so values outside APPROVED/REJECTED get a precise 400.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModerateCommentDto {
    #[schema(example = "APPROVED")]
    pub status: String,
}

/// Query params for the moderation list
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct CommentQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    pub status: Option<CommentStatus>,
}

impl CommentQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}
