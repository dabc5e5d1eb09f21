use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::advertisements::models::{AdMetricType, AdStats};

/// Append-only impression and click log
pub struct AdMetricService {
    pool: PgPool,
}

impl AdMetricService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one event. The ad id is not checked against `advertisements`.
    pub async fn record(&self, ad_id: Uuid, kind: AdMetricType) -> Result<()> {
        sqlx::query("INSERT INTO ad_metrics (id, ad_id, type) VALUES ($1, $2, $3)")
            .bind(Uuid::now_v7())
            .bind(ad_id)
            .bind(kind)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record {} for ad {}: {:?}", kind, ad_id, e);
                AppError::Database(e)
            })?;

        tracing::debug!("Recorded {} for ad {}", kind, ad_id);
        Ok(())
    }

    /// Counters and CTR of one ad. An ad without any events is NotFound.
    pub async fn stats(&self, ad_id: Uuid) -> Result<AdStats> {
        let rows = sqlx::query_as::<_, (AdMetricType, i64)>(
            "SELECT type, COUNT(*) FROM ad_metrics WHERE ad_id = $1 GROUP BY type",
        )
        .bind(ad_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate metrics of ad {}: {:?}", ad_id, e);
            AppError::Database(e)
        })?;

        if rows.is_empty() {
            return Err(AppError::NotFound(format!(
                "No metrics recorded for advertisement {}",
                ad_id
            )));
        }
        Ok(AdStats::from_grouped(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_stats_without_events_is_not_found(pool: PgPool) {
        let result = AdMetricService::new(pool).stats(Uuid::now_v7()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_stats_count_and_ctr(pool: PgPool) {
        let metrics = AdMetricService::new(pool);
        let ad_id = Uuid::now_v7();
        let other_ad = Uuid::now_v7();

        for _ in 0..100 {
            metrics.record(ad_id, AdMetricType::Impression).await.unwrap();
        }
        for _ in 0..4 {
            metrics.record(ad_id, AdMetricType::Click).await.unwrap();
        }
        metrics.record(other_ad, AdMetricType::Click).await.unwrap();

        let stats = metrics.stats(ad_id).await.unwrap();
        assert_eq!(stats.impressions, 100);
        assert_eq!(stats.clicks, 4);
        assert_eq!(stats.ctr.to_string(), "4.00");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_clicks_without_impressions_have_zero_ctr(pool: PgPool) {
        let metrics = AdMetricService::new(pool);
        let ad_id = Uuid::now_v7();
        metrics.record(ad_id, AdMetricType::Click).await.unwrap();

        let stats = metrics.stats(ad_id).await.unwrap();
        assert_eq!(stats.impressions, 0);
        assert_eq!(stats.ctr.to_string(), "0.00");
    }
}
