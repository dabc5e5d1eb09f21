use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Comment lifecycle matching the `comment_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "comment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentStatus::Pending => write!(f, "PENDING"),
            CommentStatus::Approved => write!(f, "APPROVED"),
            CommentStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl CommentStatus {
    /// Parse a moderator's decision. Only APPROVED and REJECTED are decisions.
    pub fn parse_decision(raw: &str) -> Result<Self, AppError> {
        match raw.trim() {
            "APPROVED" => Ok(CommentStatus::Approved),
            "REJECTED" => Ok(CommentStatus::Rejected),
            other => Err(AppError::BadRequest(format!(
                "Invalid comment status '{}': expected APPROVED or REJECTED",
                other
            ))),
        }
    }
}

/// Database model for comment
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub status: CommentStatus,
    pub author_id: Uuid,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Approved comment as shown under an article
#[derive(Debug, Clone, FromRow)]
pub struct PublicComment {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Moderation queue row
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithContext {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision() {
        assert_eq!(
            CommentStatus::parse_decision("APPROVED").unwrap(),
            CommentStatus::Approved
        );
        assert_eq!(
            CommentStatus::parse_decision("REJECTED").unwrap(),
            CommentStatus::Rejected
        );
        for bad in ["ARCHIVED", "PENDING", "approved", ""] {
            assert!(matches!(
                CommentStatus::parse_decision(bad),
                Err(AppError::BadRequest(_))
            ));
        }
    }
}
