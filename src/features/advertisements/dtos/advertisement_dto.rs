use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::advertisements::models::{AdStats, AdStatus, Advertisement};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::SLOT_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementResponseDto {
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

impl From<Advertisement> for AdvertisementResponseDto {
    fn from(ad: Advertisement) -> Self {
        Self {
            id: ad.id,
            title: ad.title,
            description: ad.description,
            image_url: ad.image_url,
            target_url: ad.target_url,
            position: ad.position,
            display_place: ad.display_place,
            status: ad.status,
            created_by: ad.created_by,
            created_at: ad.created_at,
            updated_at: ad.updated_at,
        }
    }
}

/// Request DTO for creating an advertisement
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdvertisementDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "imageUrl must be a valid URL"))]
    pub image_url: String,

    #[validate(url(message = "targetUrl must be a valid URL"))]
    pub target_url: String,

    /// Slot within the page, e.g. "top" or "sidebar-right"
    #[validate(regex(path = *SLOT_REGEX, message = "position must be a lowercase slug"))]
    #[schema(example = "top")]
    pub position: String,

    /// Page the ad appears on, e.g. "home" or "post-detail"
    #[validate(regex(path = *SLOT_REGEX, message = "displayPlace must be a lowercase slug"))]
    #[schema(example = "home")]
    pub display_place: String,
}

/// Request DTO for pausing, resuming or ending a campaign
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateAdStatusDto {
    #[schema(example = "PAUSED")]
    pub status: String,
}

/// Query params for listing advertisements
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct AdvertisementQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    pub status: Option<AdStatus>,
}

impl AdvertisementQueryParams {
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

/// Slot lookup for the public ad server
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct PlacementQuery {
    pub display_place: String,
    pub position: String,
}

/// Body of the impression and click beacons
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetricDto {
    pub ad_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdStatsDto {
    pub impressions: i64,
    pub clicks: i64,
    /// Click-through rate in percent with two decimals, e.g. "4.00"
    #[schema(example = "4.00")]
    pub ctr: String,
}

impl From<AdStats> for AdStatsDto {
    fn from(stats: AdStats) -> Self {
        Self {
            impressions: stats.impressions,
            clicks: stats.clicks,
            ctr: stats.ctr.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateAdvertisementDto {
        CreateAdvertisementDto {
            title: "Khuyến mãi mùa hè".to_string(),
            description: None,
            image_url: "https://cdn.example.com/banner.png".to_string(),
            target_url: "https://shop.example.com/sale".to_string(),
            position: "top".to_string(),
            display_place: "home".to_string(),
        }
    }

    #[test]
    fn test_create_validation() {
        assert!(create_dto().validate().is_ok());

        let mut dto = create_dto();
        dto.target_url = "not a url".to_string();
        assert!(dto.validate().is_err());

        let mut dto = create_dto();
        dto.display_place = "Home Page".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_stats_dto_renders_ctr_string() {
        let json = serde_json::to_value(AdStatsDto::from(AdStats::from_counts(100, 4))).unwrap();
        assert_eq!(json["impressions"], 100);
        assert_eq!(json["clicks"], 4);
        assert_eq!(json["ctr"], "4.00");
    }
}
