use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Ad lifecycle matching the `ad_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ad_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdStatus {
    Pending,
    Active,
    Paused,
    Ended,
}

impl std::fmt::Display for AdStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdStatus::Pending => write!(f, "PENDING"),
            AdStatus::Active => write!(f, "ACTIVE"),
            AdStatus::Paused => write!(f, "PAUSED"),
            AdStatus::Ended => write!(f, "ENDED"),
        }
    }
}

impl AdStatus {
    /// Parse a status an advertiser may switch to (ACTIVE, PAUSED or ENDED)
    pub fn parse_change(value: &str) -> Result<Self, AppError> {
        match value.trim() {
            "ACTIVE" => Ok(AdStatus::Active),
            "PAUSED" => Ok(AdStatus::Paused),
            "ENDED" => Ok(AdStatus::Ended),
            other => Err(AppError::BadRequest(format!(
                "Invalid ad status '{}': expected ACTIVE, PAUSED or ENDED",
                other
            ))),
        }
    }

    /// An ended campaign stays ended
    pub fn check_transition(self, next: AdStatus) -> Result<(), AppError> {
        if self == AdStatus::Ended && next == AdStatus::Active {
            return Err(AppError::Conflict(
                "An ended advertisement cannot be re-activated".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for an advertisement
#[derive(Debug, Clone, FromRow)]
pub struct Advertisement {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub target_url: String,
    pub position: String,
    pub display_place: String,
    pub status: AdStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting an advertisement
#[derive(Debug)]
pub struct CreateAdvertisement {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub target_url: String,
    pub position: String,
    pub display_place: String,
    pub created_by: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_change() {
        assert_eq!(AdStatus::parse_change("PAUSED").unwrap(), AdStatus::Paused);
        assert!(AdStatus::parse_change("PENDING").is_err());
        assert!(AdStatus::parse_change("paused").is_err());
    }

    #[test]
    fn test_ended_cannot_restart() {
        assert!(matches!(
            AdStatus::Ended.check_transition(AdStatus::Active),
            Err(AppError::Conflict(_))
        ));
        assert!(AdStatus::Ended.check_transition(AdStatus::Paused).is_ok());
        assert!(AdStatus::Paused.check_transition(AdStatus::Active).is_ok());
        assert!(AdStatus::Active.check_transition(AdStatus::Ended).is_ok());
    }
}
