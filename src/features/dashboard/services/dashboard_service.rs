use chrono::Utc;
use futures::future::try_join_all;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::dashboard::dtos::{DashboardOverviewDto, MonthlyStatDto};
use crate::features::dashboard::models::{month_windows, MonthWindow};
use crate::shared::constants::OVERVIEW_MONTHS;

/// Service for the admin dashboard
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Headline counters plus per-month activity
    pub async fn overview(&self) -> Result<DashboardOverviewDto> {
        let windows = month_windows(Utc::now(), OVERVIEW_MONTHS);

        let (user_count, post_count, comment_count, active_ad_count, stats) = futures::try_join!(
            self.count("users", "SELECT COUNT(*) FROM users"),
            self.count("posts", "SELECT COUNT(*) FROM posts WHERE status <> 'DELETED'"),
            self.count("comments", "SELECT COUNT(*) FROM comments"),
            self.count(
                "advertisements",
                "SELECT COUNT(*) FROM advertisements WHERE status = 'ACTIVE'"
            ),
            try_join_all(windows.iter().map(|w| self.month_stat(w))),
        )?;

        Ok(DashboardOverviewDto {
            user_count,
            post_count,
            comment_count,
            active_ad_count,
            stats,
        })
    }

    async fn month_stat(&self, window: &MonthWindow) -> Result<MonthlyStatDto> {
        let (users, posts, comments) = futures::try_join!(
            self.count_created("users", window),
            self.count_created("posts", window),
            self.count_created("comments", window),
        )?;

        Ok(MonthlyStatDto {
            name: window.label.clone(),
            users,
            posts,
            comments,
        })
    }

    async fn count(&self, what: &str, sql: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count {}: {:?}", what, e);
                AppError::Database(e)
            })
    }

    /// Rows of `table` created inside the window. `table` is always a literal.
    async fn count_created(&self, table: &'static str, window: &MonthWindow) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE created_at >= $1 AND created_at < $2",
            table
        ))
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count {} for {}: {:?}", table, window.label, e);
            AppError::Database(e)
        })
    }
}
