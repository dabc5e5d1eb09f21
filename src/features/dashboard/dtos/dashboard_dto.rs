use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// New accounts, posts and comments created in one month
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyStatDto {
    /// "Tháng N"
    pub name: String,
    pub users: i64,
    pub posts: i64,
    pub comments: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverviewDto {
    pub user_count: i64,
    /// Posts that are not soft-deleted
    pub post_count: i64,
    pub comment_count: i64,
    pub active_ad_count: i64,
    /// Current month and the months before it, oldest first
    pub stats: Vec<MonthlyStatDto>,
}
