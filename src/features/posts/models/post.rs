use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::model::SessionUser;

/// Article lifecycle matching the `post_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "post_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Draft,
    Pending,
    Published,
    Archived,
    /// Soft delete. Rows are never removed.
    Deleted,
}

impl PostStatus {
    /// Statuses an author may set without editorial rights
    pub fn is_author_settable(self) -> bool {
        matches!(self, PostStatus::Draft | PostStatus::Pending)
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "DRAFT"),
            PostStatus::Pending => write!(f, "PENDING"),
            PostStatus::Published => write!(f, "PUBLISHED"),
            PostStatus::Archived => write!(f, "ARCHIVED"),
            PostStatus::Deleted => write!(f, "DELETED"),
        }
    }
}

/// Database model for an article
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub author_id: Uuid,
    pub author_name: String,
    pub image_urls: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List row: an article without its body, with a plain-text excerpt
#[derive(Debug, Clone, FromRow)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub status: PostStatus,
    pub author_id: Uuid,
    pub author_name: String,
    pub image_urls: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Published articles are public. Anything else is visible to its author and staff only.
pub fn can_view(status: PostStatus, author_id: Uuid, viewer: Option<&SessionUser>) -> bool {
    status == PostStatus::Published
        || viewer.is_some_and(|v| v.id == author_id || v.is_staff())
}

/// Authors may edit their own posts between DRAFT and PENDING. Editors and
/// admins may edit any post and set any status.
pub fn check_edit(
    actor: &SessionUser,
    author_id: Uuid,
    new_status: Option<PostStatus>,
) -> Result<(), AppError> {
    if actor.can_publish() {
        return Ok(());
    }
    if actor.id != author_id {
        return Err(AppError::Unauthorized(
            "Only the author or an editor can edit this post".to_string(),
        ));
    }
    match new_status {
        Some(status) if !status.is_author_settable() => Err(AppError::Unauthorized(format!(
            "Only editors can set status {}",
            status
        ))),
        _ => Ok(()),
    }
}
