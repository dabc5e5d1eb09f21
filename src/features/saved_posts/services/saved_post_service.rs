use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{is_foreign_key_violation, AppError, Result};
use crate::features::saved_posts::models::{SaveOutcome, SavedPost};
use crate::shared::types::PaginationQuery;

/// Service for a reader's bookmarked articles
pub struct SavedPostService {
    pool: PgPool,
}

impl SavedPostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, user_id: Uuid, post_id: i64) -> Result<SaveOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO saved_posts (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, post_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::NotFound(format!("Post {} not found", post_id));
            }
            tracing::error!("Failed to save post {}: {:?}", post_id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Ok(SaveOutcome::AlreadySaved);
        }
        tracing::info!("User {} saved post {}", user_id, post_id);
        Ok(SaveOutcome::Created)
    }

    pub async fn unsave(&self, user_id: Uuid, post_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM saved_posts WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to unsave post {}: {:?}", post_id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Post {} is not in saved posts",
                post_id
            )));
        }
        Ok(())
    }

    pub async fn is_saved(&self, user_id: Uuid, post_id: i64) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM saved_posts WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check saved post {}: {:?}", post_id, e);
            AppError::Database(e)
        })
    }

    /// Saved articles, most recently saved first. Soft-deleted posts are skipped.
    pub async fn list(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<SavedPost>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM saved_posts s
            JOIN posts p ON p.id = s.post_id
            WHERE s.user_id = $1 AND p.status <> 'DELETED'
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count saved posts: {:?}", e);
            AppError::Database(e)
        })?;

        let posts = sqlx::query_as::<_, SavedPost>(
            r#"
            SELECT p.id, p.title,
                   left(btrim(regexp_replace(p.content, '<[^>]*>', ' ', 'g')), 200) AS excerpt,
                   p.status, p.author_id, u.name AS author_name,
                   p.image_urls, p.published_at, p.created_at,
                   s.created_at AS saved_at
            FROM saved_posts s
            JOIN posts p ON p.id = s.post_id
            JOIN users u ON u.id = p.author_id
            WHERE s.user_id = $1 AND p.status <> 'DELETED'
            ORDER BY s.created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list saved posts: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((posts, total))
    }
}
