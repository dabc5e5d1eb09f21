use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{
    Report, ReportDetail, ReportStatus, ReportType, ReportWithContext,
};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub post_id: Option<i64>,
    pub comment_id: Option<Uuid>,
    pub reason: String,
    pub notes: Option<String>,
    pub status: ReportStatus,
    pub reporter_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            report_type: r.report_type,
            post_id: r.post_id,
            comment_id: r.comment_id,
            reason: r.reason,
            notes: r.notes,
            status: r.status,
            reporter_id: r.reporter_id,
            reporter_name: None,
            content_preview: None,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<ReportWithContext> for ReportResponseDto {
    fn from(r: ReportWithContext) -> Self {
        Self {
            reporter_name: Some(r.reporter_name),
            content_preview: r.content_preview,
            ..Self::from(r.report)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportedPostDto {
    pub title: String,
    pub content: String,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportedCommentDto {
    pub content: String,
}

/// Report fields plus the reported post or comment in full
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetailDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub post: Option<ReportedPostDto>,
    pub comment: Option<ReportedCommentDto>,
}

impl From<ReportDetail> for ReportDetailDto {
    fn from(d: ReportDetail) -> Self {
        let post = match (d.post_title, d.post_content, d.post_created_at) {
            (Some(title), Some(content), Some(created_at)) => Some(ReportedPostDto {
                title,
                content,
                image_urls: d.post_image_urls.unwrap_or_default(),
                created_at,
            }),
            _ => None,
        };
        Self {
            report: d.context.into(),
            post,
            comment: d
                .comment_content
                .map(|content| ReportedCommentDto { content }),
        }
    }
}

/// Request DTO for reporting a post or a comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    pub post_id: Option<i64>,
    pub comment_id: Option<Uuid>,

    #[validate(length(max = 1000, message = "Reason must be at most 1000 characters"))]
    #[schema(example = "Nội dung sai sự thật")]
    pub reason: String,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    /// Optional; must equal the caller when present
    pub reporter_id: Option<Uuid>,
}

/// Request DTO for a moderator's decision on a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReportDto {
    #[schema(example = "ACCEPTED")]
    pub status: String,
    /// Hide the reported content when the report is accepted
    #[serde(default)]
    pub hide_content: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReportResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    /// Whether the reported post or comment was taken down
    pub content_hidden: bool,
}

/// Query params for listing reports
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ReportQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    pub status: Option<ReportStatus>,
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub report_type: Option<ReportType>,
}

impl ReportQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(status: ReportStatus) -> Report {
        let now = Utc::now();
        Report {
            id: Uuid::now_v7(),
            report_type: ReportType::Comment,
            post_id: None,
            comment_id: Some(Uuid::now_v7()),
            reason: "spam".to_string(),
            notes: None,
            status,
            reporter_id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_response_uses_type_key() {
        let dto = ReportResponseDto::from(sample_report(ReportStatus::Pending));

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "COMMENT");
        assert_eq!(json["status"], "PENDING");
        assert!(json["postId"].is_null());
        assert!(json.get("reporterName").is_none());
    }

    #[test]
    fn test_resolution_keeps_report_fields_at_top_level() {
        let dto = ResolveReportResponseDto {
            report: ReportResponseDto::from(sample_report(ReportStatus::Accepted)),
            content_hidden: true,
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["status"], "ACCEPTED");
        assert_eq!(json["type"], "COMMENT");
        assert_eq!(json["contentHidden"], true);
        assert!(json.get("report").is_none());
        assert!(json["updatedAt"].is_string());
    }

    #[test]
    fn test_detail_carries_full_post() {
        let mut report = sample_report(ReportStatus::Pending);
        report.report_type = ReportType::Post;
        report.post_id = Some(42);
        report.comment_id = None;
        let created_at = Utc::now();

        let dto = ReportDetailDto::from(ReportDetail {
            context: ReportWithContext {
                report,
                reporter_name: "Lan".to_string(),
                content_preview: Some("Tiêu đề".to_string()),
            },
            post_title: Some("Tiêu đề".to_string()),
            post_content: Some("Nội dung đầy đủ".to_string()),
            post_image_urls: Some(vec!["https://cdn.example.com/a.jpg".to_string()]),
            post_created_at: Some(created_at),
            comment_content: None,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["postId"], 42);
        assert_eq!(json["reporterName"], "Lan");
        assert_eq!(json["post"]["content"], "Nội dung đầy đủ");
        assert_eq!(json["post"]["imageUrls"][0], "https://cdn.example.com/a.jpg");
        assert!(json["post"]["createdAt"].is_string());
        assert!(json["comment"].is_null());
    }

    #[test]
    fn test_resolve_dto_hide_is_optional() {
        let dto: ResolveReportDto = serde_json::from_str(r#"{"status":"REJECTED"}"#).unwrap();
        assert_eq!(dto.hide_content, None);

        let dto: ResolveReportDto =
            serde_json::from_str(r#"{"status":"ACCEPTED","hideContent":true}"#).unwrap();
        assert_eq!(dto.hide_content, Some(true));
    }
}
