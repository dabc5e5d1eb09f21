use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::SessionUser;
use crate::features::comments::dtos::{CommentQueryParams, CreateCommentDto};
use crate::features::comments::models::{
    Comment, CommentStatus, CommentWithContext, PublicComment,
};

/// Service for comment operations
pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a PENDING comment to a published article
    pub async fn create(&self, author: &SessionUser, dto: CreateCommentDto) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, content, status, author_id, post_id)
            SELECT $1, $2, 'PENDING', $3, p.id
            FROM posts p
            WHERE p.id = $4 AND p.status = 'PUBLISHED'
            RETURNING id, content, status, author_id, post_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(dto.content.trim())
        .bind(author.id)
        .bind(dto.post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create comment: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", dto.post_id)))?;

        tracing::info!(
            "User {} commented {} on post {}",
            author.id,
            comment.id,
            comment.post_id
        );
        Ok(comment)
    }

    /// Approved comments on an article, oldest first
    pub async fn list_approved(&self, post_id: i64) -> Result<Vec<PublicComment>> {
        sqlx::query_as::<_, PublicComment>(
            r#"
            SELECT c.id, c.content, c.author_id, u.name AS author_name,
                   u.avatar AS author_avatar, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1 AND c.status = 'APPROVED'
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list comments of post {}: {:?}", post_id, e);
            AppError::Database(e)
        })
    }

    /// Moderation queue, newest first
    pub async fn list_all(
        &self,
        params: &CommentQueryParams,
    ) -> Result<(Vec<CommentWithContext>, i64)> {
        let pagination = params.pagination();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE ($1::comment_status IS NULL OR status = $1)",
        )
        .bind(params.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count comments: {:?}", e);
            AppError::Database(e)
        })?;

        let comments = sqlx::query_as::<_, CommentWithContext>(
            r#"
            SELECT c.id, c.content, c.status, c.author_id, u.name AS author_name,
                   c.post_id, p.title AS post_title, c.created_at, c.updated_at
            FROM comments c
            JOIN users u ON u.id = c.author_id
            JOIN posts p ON p.id = c.post_id
            WHERE ($1::comment_status IS NULL OR c.status = $1)
            ORDER BY c.created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(params.status)
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list comments: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((comments, total))
    }

    /// Approve or reject a comment. Last write wins; linked reports are untouched.
    pub async fn moderate(&self, actor: &SessionUser, id: Uuid, status: &str) -> Result<Comment> {
        let status = CommentStatus::parse_decision(status)?;

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, content, status, author_id, post_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to moderate comment {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))?;

        tracing::info!("User {} set comment {} to {}", actor.id, id, status);
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{seed_comment, seed_post, seed_user};

    async fn stored_status(pool: &PgPool, id: Uuid) -> CommentStatus {
        sqlx::query_scalar("SELECT status FROM comments WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_new_comment_waits_for_approval(pool: PgPool) {
        let author = seed_user(&pool, UserRole::Editor).await;
        let reader = seed_user(&pool, UserRole::User).await;
        let moderator = seed_user(&pool, UserRole::Moderator).await;
        let post_id = seed_post(&pool, author.id, "PUBLISHED").await;
        let service = CommentService::new(pool.clone());

        let comment = service
            .create(
                &reader,
                CreateCommentDto {
                    post_id,
                    content: "  Bài viết hay  ".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(comment.status, CommentStatus::Pending);
        assert_eq!(comment.content, "Bài viết hay");
        assert!(service.list_approved(post_id).await.unwrap().is_empty());

        service
            .moderate(&moderator, comment.id, "APPROVED")
            .await
            .unwrap();
        let visible = service.list_approved(post_id).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, comment.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_comment_on_draft_is_not_found(pool: PgPool) {
        let author = seed_user(&pool, UserRole::Editor).await;
        let reader = seed_user(&pool, UserRole::User).await;
        let post_id = seed_post(&pool, author.id, "DRAFT").await;

        let result = CommentService::new(pool)
            .create(
                &reader,
                CreateCommentDto {
                    post_id,
                    content: "Sớm quá".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_decision_leaves_comment_unchanged(pool: PgPool) {
        let author = seed_user(&pool, UserRole::Editor).await;
        let moderator = seed_user(&pool, UserRole::Moderator).await;
        let post_id = seed_post(&pool, author.id, "PUBLISHED").await;
        let comment_id = seed_comment(&pool, post_id, author.id, "APPROVED").await;

        let result = CommentService::new(pool.clone())
            .moderate(&moderator, comment_id, "ARCHIVED")
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(stored_status(&pool, comment_id).await, CommentStatus::Approved);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_moderating_missing_comment_is_not_found(pool: PgPool) {
        let moderator = seed_user(&pool, UserRole::Moderator).await;

        let result = CommentService::new(pool)
            .moderate(&moderator, Uuid::now_v7(), "REJECTED")
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
