use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::posts::dtos::PostSummaryDto;
use crate::features::saved_posts::models::SavedPost;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedPostDto {
    pub post: PostSummaryDto,
    pub saved_at: DateTime<Utc>,
}

impl From<SavedPost> for SavedPostDto {
    fn from(s: SavedPost) -> Self {
        Self {
            post: s.post.into(),
            saved_at: s.saved_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePostDto {
    pub post_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedStatusDto {
    pub saved: bool,
}
