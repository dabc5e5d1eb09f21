use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{is_foreign_key_violation, AppError, Result};
use crate::features::auth::model::SessionUser;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::Category;
use crate::features::posts::dtos::{CreatePostDto, PostQueryParams, PostResponseDto, UpdatePostDto};
use crate::features::posts::models::{can_view, check_edit, Post, PostStatus, PostSummary};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::non_blank;

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.status, p.author_id, u.name AS author_name,
           p.image_urls, p.published_at, p.created_at, p.updated_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

/// Excerpt is the first 200 characters of the body with tags stripped
const SUMMARY_SELECT: &str = r#"
    SELECT p.id, p.title,
           left(btrim(regexp_replace(p.content, '<[^>]*>', ' ', 'g')), 200) AS excerpt,
           p.status, p.author_id, u.name AS author_name,
           p.image_urls, p.published_at, p.created_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

/// Service for article operations
pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> Result<Post> {
        sqlx::query_as::<_, Post>(&format!("{} WHERE p.id = $1", POST_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch post {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
    }

    async fn categories_of(&self, id: i64) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.slug, c.description, c.display_order, c.created_at
            FROM categories c
            JOIN post_categories pc ON pc.category_id = c.id
            WHERE pc.post_id = $1
            ORDER BY c.display_order, c.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch categories of post {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(CategoryResponseDto::from).collect())
    }

    async fn detail(&self, post: Post) -> Result<PostResponseDto> {
        let categories = self.categories_of(post.id).await?;
        Ok(PostResponseDto::new(post, categories))
    }

    async fn replace_categories(
        tx: &mut Transaction<'_, Postgres>,
        post_id: i64,
        category_ids: &[Uuid],
    ) -> Result<()> {
        sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to clear categories of post {}: {:?}", post_id, e);
                AppError::Database(e)
            })?;

        if category_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO post_categories (post_id, category_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::BadRequest("Unknown category id".to_string());
            }
            tracing::error!("Failed to link categories to post {}: {:?}", post_id, e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    /// Submit an article as DRAFT or PENDING
    pub async fn create(&self, author: &SessionUser, dto: CreatePostDto) -> Result<PostResponseDto> {
        let status = dto.status.unwrap_or(PostStatus::Draft);
        if !status.is_author_settable() {
            return Err(AppError::BadRequest(format!(
                "New posts must be DRAFT or PENDING, got {}",
                status
            )));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO posts (title, content, status, author_id, image_urls)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(dto.title.trim())
        .bind(&dto.content)
        .bind(status)
        .bind(author.id)
        .bind(&dto.image_urls)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create post: {:?}", e);
            AppError::Database(e)
        })?;

        Self::replace_categories(&mut tx, id, &dto.category_ids).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit post: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("User {} created post {} as {}", author.id, id, status);
        let post = self.fetch(id).await?;
        self.detail(post).await
    }

    /// Edit an article. Setting PUBLISHED stamps `published_at` the first time.
    pub async fn update(
        &self,
        actor: &SessionUser,
        id: i64,
        dto: UpdatePostDto,
    ) -> Result<PostResponseDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let author_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT author_id FROM posts WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock post {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

        check_edit(actor, author_id, dto.status)?;

        sqlx::query(
            r#"
            UPDATE posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                status = COALESCE($4, status),
                image_urls = COALESCE($5, image_urls),
                published_at = CASE
                    WHEN $4 = 'PUBLISHED'::post_status AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(non_blank(dto.title.as_deref()))
        .bind(&dto.content)
        .bind(dto.status)
        .bind(&dto.image_urls)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update post {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if let Some(category_ids) = &dto.category_ids {
            Self::replace_categories(&mut tx, id, category_ids).await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit post update: {:?}", e);
            AppError::Database(e)
        })?;

        match dto.status {
            Some(status) => tracing::info!("User {} updated post {} to {}", actor.id, id, status),
            None => tracing::info!("User {} updated post {}", actor.id, id),
        }

        let post = self.fetch(id).await?;
        self.detail(post).await
    }

    /// Single article. Unpublished ones look missing to everyone but their author and staff.
    pub async fn get(&self, id: i64, viewer: Option<&SessionUser>) -> Result<PostResponseDto> {
        let post = self.fetch(id).await?;
        if !can_view(post.status, post.author_id, viewer) {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }
        self.detail(post).await
    }

    /// Newest published articles for the home page strip
    pub async fn latest(&self, limit: i64) -> Result<Vec<PostSummary>> {
        sqlx::query_as::<_, PostSummary>(&format!(
            "{} WHERE p.status = 'PUBLISHED' ORDER BY p.published_at DESC NULLS LAST, p.id DESC LIMIT $1",
            SUMMARY_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list latest posts: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Published articles in one category, newest first
    pub async fn list_by_category(
        &self,
        category_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<PostSummary>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM posts p
            JOIN post_categories pc ON pc.post_id = p.id
            WHERE pc.category_id = $1 AND p.status = 'PUBLISHED'
            "#,
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count posts in category: {:?}", e);
            AppError::Database(e)
        })?;

        let posts = sqlx::query_as::<_, PostSummary>(&format!(
            r#"{}
            JOIN post_categories pc ON pc.post_id = p.id
            WHERE pc.category_id = $1 AND p.status = 'PUBLISHED'
            ORDER BY p.created_at DESC, p.id DESC
            OFFSET $2 LIMIT $3"#,
            SUMMARY_SELECT
        ))
        .bind(category_id)
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list posts in category: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((posts, total))
    }

    /// Every article regardless of status (staff)
    pub async fn list_all(&self, params: &PostQueryParams) -> Result<(Vec<PostSummary>, i64)> {
        let pagination = params.pagination();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts WHERE ($1::post_status IS NULL OR status = $1)",
        )
        .bind(params.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count posts: {:?}", e);
            AppError::Database(e)
        })?;

        let posts = sqlx::query_as::<_, PostSummary>(&format!(
            r#"{}
            WHERE ($1::post_status IS NULL OR p.status = $1)
            ORDER BY p.created_at DESC, p.id DESC
            OFFSET $2 LIMIT $3"#,
            SUMMARY_SELECT
        ))
        .bind(params.status)
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list posts: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((posts, total))
    }
}
