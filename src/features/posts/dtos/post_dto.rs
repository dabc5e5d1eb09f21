use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::posts::models::{Post, PostStatus, PostSummary};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

/// Full article with its sections
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponseDto {
    pub id: i64,
    pub title: String,
    /// Rich-text HTML, returned as stored
    pub content: String,
    pub status: PostStatus,
    pub author_id: Uuid,
    pub author_name: String,
    pub image_urls: Vec<String>,
    pub categories: Vec<CategoryResponseDto>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostResponseDto {
    pub fn new(post: Post, categories: Vec<CategoryResponseDto>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            status: post.status,
            author_id: post.author_id,
            author_name: post.author_name,
            image_urls: post.image_urls,
            categories,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostSummaryDto {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub status: PostStatus,
    pub author_id: Uuid,
    pub author_name: String,
    /// First image, used as the thumbnail
    pub thumbnail: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PostSummary> for PostSummaryDto {
    fn from(p: PostSummary) -> Self {
        Self {
            id: p.id,
            title: p.title,
            excerpt: p.excerpt,
            status: p.status,
            author_id: p.author_id,
            author_name: p.author_name,
            thumbnail: p.image_urls.into_iter().next(),
            published_at: p.published_at,
            created_at: p.created_at,
        }
    }
}

/// Request DTO for submitting an article
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostDto {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    /// DRAFT (default) or PENDING
    pub status: Option<PostStatus>,

    #[serde(default)]
    pub category_ids: Vec<Uuid>,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 images per post"))]
    pub image_urls: Vec<String>,
}

/// Request DTO for editing an article. Omitted fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostDto {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: Option<String>,

    pub status: Option<PostStatus>,

    /// Replaces the category set when present
    pub category_ids: Option<Vec<Uuid>>,

    #[validate(length(max = 20, message = "At most 20 images per post"))]
    pub image_urls: Option<Vec<String>>,
}

/// Query params for the staff post list
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct PostQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    pub status: Option<PostStatus>,
}

impl PostQueryParams {
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
