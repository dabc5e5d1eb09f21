use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{is_foreign_key_violation, AppError, Result};
use crate::features::auth::model::SessionUser;
use crate::features::reports::dtos::{CreateReportDto, ReportQueryParams, ResolveReportDto};
use crate::features::reports::models::{
    cascade_action, CascadeAction, CreateReport, Report, ReportDetail, ReportStatus,
    ReportTarget, ReportWithContext,
};
use crate::shared::validation::non_blank;

const REPORT_COLUMNS: &str = r#"
    id, type, post_id, comment_id, reason, notes, status, reporter_id, created_at, updated_at
"#;

const CONTEXT_SELECT: &str = r#"
    SELECT r.id, r.type, r.post_id, r.comment_id, r.reason, r.notes, r.status,
           r.reporter_id, r.created_at, r.updated_at,
           u.name AS reporter_name,
           COALESCE(p.title, left(c.content, 200)) AS content_preview
    FROM reports r
    JOIN users u ON u.id = r.reporter_id
    LEFT JOIN posts p ON p.id = r.post_id
    LEFT JOIN comments c ON c.id = r.comment_id
"#;

const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.type, r.post_id, r.comment_id, r.reason, r.notes, r.status,
           r.reporter_id, r.created_at, r.updated_at,
           u.name AS reporter_name,
           COALESCE(p.title, left(c.content, 200)) AS content_preview,
           p.title AS post_title, p.content AS post_content,
           p.image_urls AS post_image_urls, p.created_at AS post_created_at,
           c.content AS comment_content
    FROM reports r
    JOIN users u ON u.id = r.reporter_id
    LEFT JOIN posts p ON p.id = r.post_id
    LEFT JOIN comments c ON c.id = r.comment_id
    WHERE r.id = $1
"#;

/// Outcome of a moderator's decision
#[derive(Debug)]
pub struct Resolution {
    pub report: Report,
    pub content_hidden: bool,
}

/// Service for report operations
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// File a report against a post or a comment
    pub async fn create(&self, reporter: &SessionUser, dto: CreateReportDto) -> Result<Report> {
        if let Some(claimed) = dto.reporter_id {
            if claimed != reporter.id {
                return Err(AppError::Unauthorized(
                    "reporterId does not match the signed-in user".to_string(),
                ));
            }
        }

        let reason = non_blank(Some(dto.reason.as_str()))
            .ok_or_else(|| AppError::Validation("Reason is required".to_string()))?;
        let target = ReportTarget::from_ids(dto.post_id, dto.comment_id)?;

        self.insert(CreateReport {
            target,
            reason,
            notes: non_blank(dto.notes.as_deref()),
            reporter_id: reporter.id,
        })
        .await
    }

    async fn insert(&self, data: CreateReport) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports (id, type, post_id, comment_id, reason, notes, reporter_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(data.target.report_type())
        .bind(data.target.post_id())
        .bind(data.target.comment_id())
        .bind(&data.reason)
        .bind(&data.notes)
        .bind(data.reporter_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return match data.target {
                    ReportTarget::Post(id) => AppError::NotFound(format!("Post {} not found", id)),
                    ReportTarget::Comment(id) => {
                        AppError::NotFound(format!("Comment {} not found", id))
                    }
                };
            }
            tracing::error!("Failed to create report: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "User {} reported {:?} (report {})",
            data.reporter_id,
            data.target,
            report.id
        );
        Ok(report)
    }

    /// Reports for the moderation queue, newest first
    pub async fn list(
        &self,
        params: &ReportQueryParams,
    ) -> Result<(Vec<ReportWithContext>, i64)> {
        let pagination = params.pagination();

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM reports
            WHERE ($1::report_status IS NULL OR status = $1)
              AND ($2::report_type IS NULL OR type = $2)
            "#,
        )
        .bind(params.status)
        .bind(params.report_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports: {:?}", e);
            AppError::Database(e)
        })?;

        let reports = sqlx::query_as::<_, ReportWithContext>(&format!(
            r#"
            {}
            WHERE ($1::report_status IS NULL OR r.status = $1)
              AND ($2::report_type IS NULL OR r.type = $2)
            ORDER BY r.created_at DESC
            OFFSET $3 LIMIT $4
            "#,
            CONTEXT_SELECT
        ))
        .bind(params.status)
        .bind(params.report_type)
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((reports, total))
    }

    /// One report with the reported post or comment in full
    pub async fn get(&self, id: Uuid) -> Result<ReportDetail> {
        sqlx::query_as::<_, ReportDetail>(DETAIL_SELECT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get report {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Record a moderator's decision and, for an accepted report with
    /// `hideContent`, take the reported content down in the same transaction.
    pub async fn resolve(
        &self,
        actor: &SessionUser,
        id: Uuid,
        dto: ResolveReportDto,
    ) -> Result<Resolution> {
        let status: ReportStatus = dto.status.parse()?;
        let hide = dto.hide_content.unwrap_or(false);

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let current = sqlx::query_as::<_, Report>(&format!(
            "SELECT {} FROM reports WHERE id = $1 FOR UPDATE",
            REPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock report {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        if current.status != ReportStatus::Pending {
            tracing::warn!(
                "Report {} re-resolved by {}: {} -> {}",
                id,
                actor.id,
                current.status,
                status
            );
        }

        let target = current.target()?;

        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        let action = cascade_action(target, status, hide);
        if let Some(action) = action {
            apply_cascade(&mut tx, action).await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit resolution of report {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "User {} resolved report {} as {} (cascade: {:?})",
            actor.id,
            id,
            status,
            action
        );

        Ok(Resolution {
            report,
            content_hidden: action.is_some(),
        })
    }
}

/// Hide the reported content. Affecting no row aborts the resolution.
async fn apply_cascade(tx: &mut Transaction<'_, Postgres>, action: CascadeAction) -> Result<()> {
    let (result, missing) = match action {
        CascadeAction::DeletePost(post_id) => (
            sqlx::query("UPDATE posts SET status = 'DELETED', updated_at = NOW() WHERE id = $1")
                .bind(post_id)
                .execute(&mut **tx)
                .await,
            format!("Post {} not found", post_id),
        ),
        CascadeAction::RejectComment(comment_id) => (
            sqlx::query(
                "UPDATE comments SET status = 'REJECTED', updated_at = NOW() WHERE id = $1",
            )
            .bind(comment_id)
            .execute(&mut **tx)
            .await,
            format!("Comment {} not found", comment_id),
        ),
    };

    let result = result.map_err(|e| {
        tracing::error!("Failed to apply {:?}: {:?}", action, e);
        AppError::Database(e)
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(missing));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::comments::services::CommentService;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{seed_comment, seed_post, seed_user};

    fn report_on(post_id: Option<i64>, comment_id: Option<Uuid>, reason: &str) -> CreateReportDto {
        CreateReportDto {
            post_id,
            comment_id,
            reason: reason.to_string(),
            notes: None,
            reporter_id: None,
        }
    }

    fn decision(status: &str, hide: bool) -> ResolveReportDto {
        ResolveReportDto {
            status: status.to_string(),
            hide_content: Some(hide),
        }
    }

    async fn count_reports(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_accepted_hidden_comment_leaves_public_list(pool: PgPool) {
        let author = seed_user(&pool, UserRole::Editor).await;
        let reader = seed_user(&pool, UserRole::User).await;
        let moderator = seed_user(&pool, UserRole::Moderator).await;
        let post_id = seed_post(&pool, author.id, "PUBLISHED").await;
        let comment_id = seed_comment(&pool, post_id, reader.id, "APPROVED").await;

        let comments = CommentService::new(pool.clone());
        let reports = ReportService::new(pool.clone());
        assert_eq!(comments.list_approved(post_id).await.unwrap().len(), 1);

        let report = reports
            .create(&reader, report_on(None, Some(comment_id), "Xúc phạm người khác"))
            .await
            .unwrap();
        assert_eq!(report.status, ReportStatus::Pending);

        let resolution = reports
            .resolve(&moderator, report.id, decision("ACCEPTED", true))
            .await
            .unwrap();
        assert_eq!(resolution.report.status, ReportStatus::Accepted);
        assert!(resolution.content_hidden);
        assert!(comments.list_approved(post_id).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_rejected_report_leaves_post_published(pool: PgPool) {
        let author = seed_user(&pool, UserRole::Editor).await;
        let reader = seed_user(&pool, UserRole::User).await;
        let moderator = seed_user(&pool, UserRole::Moderator).await;
        let post_id = seed_post(&pool, author.id, "PUBLISHED").await;

        let reports = ReportService::new(pool.clone());
        let report = reports
            .create(&reader, report_on(Some(post_id), None, "Tin giả"))
            .await
            .unwrap();

        let resolution = reports
            .resolve(&moderator, report.id, decision("REJECTED", true))
            .await
            .unwrap();
        assert_eq!(resolution.report.status, ReportStatus::Rejected);
        assert!(!resolution.content_hidden);

        let status: String = sqlx::query_scalar("SELECT status::text FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "PUBLISHED");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_accepted_hidden_post_is_deleted(pool: PgPool) {
        let author = seed_user(&pool, UserRole::Editor).await;
        let reader = seed_user(&pool, UserRole::User).await;
        let moderator = seed_user(&pool, UserRole::Moderator).await;
        let post_id = seed_post(&pool, author.id, "PUBLISHED").await;

        let reports = ReportService::new(pool.clone());
        let report = reports
            .create(&reader, report_on(Some(post_id), None, "Tin giả"))
            .await
            .unwrap();
        reports
            .resolve(&moderator, report.id, decision("ACCEPTED", true))
            .await
            .unwrap();

        let status: String = sqlx::query_scalar("SELECT status::text FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "DELETED");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_status_writes_nothing(pool: PgPool) {
        let author = seed_user(&pool, UserRole::Editor).await;
        let reader = seed_user(&pool, UserRole::User).await;
        let moderator = seed_user(&pool, UserRole::Moderator).await;
        let post_id = seed_post(&pool, author.id, "PUBLISHED").await;

        let reports = ReportService::new(pool.clone());
        let report = reports
            .create(&reader, report_on(Some(post_id), None, "Tin giả"))
            .await
            .unwrap();

        let result = reports
            .resolve(&moderator, report.id, decision("CLOSED", true))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let stored = reports.get(report.id).await.unwrap();
        assert_eq!(stored.context.report.status, ReportStatus::Pending);
        assert_eq!(stored.context.report.updated_at, report.updated_at);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_blank_reason_creates_no_row(pool: PgPool) {
        let author = seed_user(&pool, UserRole::Editor).await;
        let reader = seed_user(&pool, UserRole::User).await;
        let post_id = seed_post(&pool, author.id, "PUBLISHED").await;

        let result = ReportService::new(pool.clone())
            .create(&reader, report_on(Some(post_id), None, "   "))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(count_reports(&pool).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_report_on_missing_post_is_not_found(pool: PgPool) {
        let reader = seed_user(&pool, UserRole::User).await;

        let result = ReportService::new(pool.clone())
            .create(&reader, report_on(Some(999_999), None, "Tin giả"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(count_reports(&pool).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_detail_includes_reported_post(pool: PgPool) {
        let author = seed_user(&pool, UserRole::Editor).await;
        let reader = seed_user(&pool, UserRole::User).await;
        let post_id = seed_post(&pool, author.id, "PUBLISHED").await;

        let reports = ReportService::new(pool.clone());
        let report = reports
            .create(&reader, report_on(Some(post_id), None, "Tin giả"))
            .await
            .unwrap();

        let detail = reports.get(report.id).await.unwrap();
        assert_eq!(detail.context.reporter_name, reader.name);
        assert_eq!(detail.post_content.as_deref(), Some("Nội dung bài viết"));
        assert_eq!(detail.post_image_urls, Some(vec![]));
        assert!(detail.post_created_at.is_some());
        assert!(detail.comment_content.is_none());
    }
}
