use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

/// Kind of tracked ad event, matching the `ad_metric_type` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ad_metric_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdMetricType {
    Impression,
    Click,
}

impl std::fmt::Display for AdMetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdMetricType::Impression => write!(f, "IMPRESSION"),
            AdMetricType::Click => write!(f, "CLICK"),
        }
    }
}

/// Aggregated counters of one advertisement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdStats {
    pub impressions: i64,
    pub clicks: i64,
    /// Click-through rate in percent, two decimal places
    pub ctr: Decimal,
}

impl AdStats {
    pub fn from_counts(impressions: i64, clicks: i64) -> Self {
        let mut ctr = if impressions == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(clicks) * Decimal::ONE_HUNDRED / Decimal::from(impressions)).round_dp(2)
        };
        ctr.rescale(2);

        Self {
            impressions,
            clicks,
            ctr,
        }
    }

    /// Build from `(type, count)` rows of a grouped count
    pub fn from_grouped(rows: &[(AdMetricType, i64)]) -> Self {
        let count = |kind| {
            rows.iter()
                .filter(|(t, _)| *t == kind)
                .map(|(_, n)| *n)
                .sum::<i64>()
        };
        Self::from_counts(count(AdMetricType::Impression), count(AdMetricType::Click))
    }
}
