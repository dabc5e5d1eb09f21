use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::features::posts::models::PostSummary;

/// A bookmarked article with the time it was saved
#[derive(Debug, Clone, FromRow)]
pub struct SavedPost {
    #[sqlx(flatten)]
    pub post: PostSummary,
    pub saved_at: DateTime<Utc>,
}

/// Result of an idempotent save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    AlreadySaved,
}
