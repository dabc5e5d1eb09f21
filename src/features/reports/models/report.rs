use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Kind of content a report points at, matching the `report_type` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    Post,
    Comment,
}

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "PENDING"),
            ReportStatus::Accepted => write!(f, "ACCEPTED"),
            ReportStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PENDING" => Ok(ReportStatus::Pending),
            "ACCEPTED" => Ok(ReportStatus::Accepted),
            "REJECTED" => Ok(ReportStatus::Rejected),
            other => Err(AppError::BadRequest(format!(
                "Invalid report status '{}': expected PENDING, ACCEPTED or REJECTED",
                other
            ))),
        }
    }
}

/// The one piece of content a report refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    Post(i64),
    Comment(Uuid),
}

impl ReportTarget {
    /// Exactly one of the two ids must be present
    pub fn from_ids(post_id: Option<i64>, comment_id: Option<Uuid>) -> Result<Self, AppError> {
        match (post_id, comment_id) {
            (Some(id), None) => Ok(ReportTarget::Post(id)),
            (None, Some(id)) => Ok(ReportTarget::Comment(id)),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "Report either a post or a comment, not both".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "postId or commentId is required".to_string(),
            )),
        }
    }

    pub fn report_type(&self) -> ReportType {
        match self {
            ReportTarget::Post(_) => ReportType::Post,
            ReportTarget::Comment(_) => ReportType::Comment,
        }
    }

    pub fn post_id(&self) -> Option<i64> {
        match self {
            ReportTarget::Post(id) => Some(*id),
            ReportTarget::Comment(_) => None,
        }
    }

    pub fn comment_id(&self) -> Option<Uuid> {
        match self {
            ReportTarget::Comment(id) => Some(*id),
            ReportTarget::Post(_) => None,
        }
    }
}

/// Content change applied when a report is upheld with the hide flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeAction {
    /// Soft-delete the post
    DeletePost(i64),
    /// Take the comment off the public list
    RejectComment(Uuid),
}

/// Only an ACCEPTED report with `hide` set touches the reported content
pub fn cascade_action(
    target: ReportTarget,
    status: ReportStatus,
    hide: bool,
) -> Option<CascadeAction> {
    if status != ReportStatus::Accepted || !hide {
        return None;
    }
    Some(match target {
        ReportTarget::Post(id) => CascadeAction::DeletePost(id),
        ReportTarget::Comment(id) => CascadeAction::RejectComment(id),
    })
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub report_type: ReportType,
    pub post_id: Option<i64>,
    pub comment_id: Option<Uuid>,
    pub reason: String,
    pub notes: Option<String>,
    pub status: ReportStatus,
    pub reporter_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn target(&self) -> Result<ReportTarget, AppError> {
        let target = ReportTarget::from_ids(self.post_id, self.comment_id)
            .map_err(|_| AppError::Internal(format!("Report {} has an invalid target", self.id)))?;
        if target.report_type() != self.report_type {
            return Err(AppError::Internal(format!(
                "Report {} type does not match its target",
                self.id
            )));
        }
        Ok(target)
    }
}

/// Report joined with its reporter and a preview of the reported content
#[derive(Debug, Clone, FromRow)]
pub struct ReportWithContext {
    #[sqlx(flatten)]
    pub report: Report,
    pub reporter_name: String,
    /// Post title or the start of the comment
    pub content_preview: Option<String>,
}

/// Single report with the full reported content, for a moderator's review
#[derive(Debug, Clone, FromRow)]
pub struct ReportDetail {
    #[sqlx(flatten)]
    pub context: ReportWithContext,
    pub post_title: Option<String>,
    pub post_content: Option<String>,
    pub post_image_urls: Option<Vec<String>>,
    pub post_created_at: Option<DateTime<Utc>>,
    pub comment_content: Option<String>,
}

/// Data for inserting a report
#[derive(Debug)]
pub struct CreateReport {
    pub target: ReportTarget,
    pub reason: String,
    pub notes: Option<String>,
    pub reporter_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_requires_exactly_one_id() {
        let comment_id = Uuid::now_v7();
        assert_eq!(
            ReportTarget::from_ids(Some(7), None).unwrap(),
            ReportTarget::Post(7)
        );
        assert_eq!(
            ReportTarget::from_ids(None, Some(comment_id)).unwrap(),
            ReportTarget::Comment(comment_id)
        );
        assert!(ReportTarget::from_ids(Some(7), Some(comment_id)).is_err());
        assert!(ReportTarget::from_ids(None, None).is_err());
    }

    #[test]
    fn test_target_type_and_columns() {
        let target = ReportTarget::Post(42);
        assert_eq!(target.report_type(), ReportType::Post);
        assert_eq!(target.post_id(), Some(42));
        assert_eq!(target.comment_id(), None);
    }

    #[test]
    fn test_cascade_truth_table() {
        let post = ReportTarget::Post(1);
        let comment_id = Uuid::now_v7();
        let comment = ReportTarget::Comment(comment_id);

        assert_eq!(
            cascade_action(post, ReportStatus::Accepted, true),
            Some(CascadeAction::DeletePost(1))
        );
        assert_eq!(
            cascade_action(comment, ReportStatus::Accepted, true),
            Some(CascadeAction::RejectComment(comment_id))
        );
        assert_eq!(cascade_action(post, ReportStatus::Accepted, false), None);
        for hide in [true, false] {
            assert_eq!(cascade_action(post, ReportStatus::Rejected, hide), None);
            assert_eq!(cascade_action(comment, ReportStatus::Rejected, hide), None);
            assert_eq!(cascade_action(comment, ReportStatus::Pending, hide), None);
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "ACCEPTED".parse::<ReportStatus>().unwrap(),
            ReportStatus::Accepted
        );
        assert!("CLOSED".parse::<ReportStatus>().is_err());
        assert!("accepted".parse::<ReportStatus>().is_err());
    }
}
