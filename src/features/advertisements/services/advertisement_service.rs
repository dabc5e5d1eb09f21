use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::advertisements::dtos::AdvertisementQueryParams;
use crate::features::advertisements::models::{AdStatus, Advertisement, CreateAdvertisement};
use crate::shared::validation::non_blank;

const AD_COLUMNS: &str = r#"
    id, title, description, image_url, target_url, position, display_place,
    status, created_by, created_at, updated_at
"#;

/// Service for advertisement campaigns
pub struct AdvertisementService {
    pool: PgPool,
}

impl AdvertisementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// New ads go live immediately
    pub async fn create(&self, data: CreateAdvertisement) -> Result<Advertisement> {
        let ad = sqlx::query_as::<_, Advertisement>(&format!(
            r#"
            INSERT INTO advertisements
                (id, title, description, image_url, target_url, position, display_place,
                 status, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'ACTIVE', $8)
            RETURNING {}
            "#,
            AD_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(data.title.trim())
        .bind(non_blank(data.description.as_deref()))
        .bind(&data.image_url)
        .bind(&data.target_url)
        .bind(&data.position)
        .bind(&data.display_place)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create advertisement: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "User {} created advertisement {} on {}/{}",
            data.created_by,
            ad.id,
            ad.display_place,
            ad.position
        );
        Ok(ad)
    }

    pub async fn list(
        &self,
        params: &AdvertisementQueryParams,
    ) -> Result<(Vec<Advertisement>, i64)> {
        let pagination = params.pagination();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM advertisements WHERE ($1::ad_status IS NULL OR status = $1)",
        )
        .bind(params.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count advertisements: {:?}", e);
            AppError::Database(e)
        })?;

        let ads = sqlx::query_as::<_, Advertisement>(&format!(
            r#"
            SELECT {} FROM advertisements
            WHERE ($1::ad_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
            AD_COLUMNS
        ))
        .bind(params.status)
        .bind(pagination.offset())
        .bind(pagination.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list advertisements: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((ads, total))
    }

    /// Switch a campaign between ACTIVE, PAUSED and ENDED
    pub async fn update_status(
        &self,
        actor_id: Uuid,
        id: Uuid,
        status: &str,
    ) -> Result<Advertisement> {
        let next = AdStatus::parse_change(status)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let current = sqlx::query_scalar::<_, AdStatus>(
            "SELECT status FROM advertisements WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock advertisement {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Advertisement {} not found", id)))?;

        current.check_transition(next)?;

        let ad = sqlx::query_as::<_, Advertisement>(&format!(
            r#"
            UPDATE advertisements SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            AD_COLUMNS
        ))
        .bind(id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update advertisement {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit advertisement {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "User {} moved advertisement {} from {} to {}",
            actor_id,
            id,
            current,
            next
        );
        Ok(ad)
    }

    /// One random ACTIVE ad for a slot, if any
    pub async fn placement(
        &self,
        display_place: &str,
        position: &str,
    ) -> Result<Option<Advertisement>> {
        sqlx::query_as::<_, Advertisement>(&format!(
            r#"
            SELECT {} FROM advertisements
            WHERE status = 'ACTIVE' AND display_place = $1 AND position = $2
            ORDER BY random()
            LIMIT 1
            "#,
            AD_COLUMNS
        ))
        .bind(display_place.trim())
        .bind(position.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to pick advertisement for {}/{}: {:?}",
                display_place,
                position,
                e
            );
            AppError::Database(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::seed_user;

    async fn seed_ad(service: &AdvertisementService, owner: Uuid) -> Advertisement {
        service
            .create(CreateAdvertisement {
                title: "Khuyến mãi mùa hè".to_string(),
                description: None,
                image_url: "https://cdn.example.com/banner.png".to_string(),
                target_url: "https://shop.example.com".to_string(),
                position: "top".to_string(),
                display_place: "home".to_string(),
                created_by: owner,
            })
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_ended_ad_cannot_be_reactivated(pool: PgPool) {
        let owner = seed_user(&pool, UserRole::Advertiser).await;
        let service = AdvertisementService::new(pool);
        let ad = seed_ad(&service, owner.id).await;
        assert_eq!(ad.status, AdStatus::Active);

        let ended = service.update_status(owner.id, ad.id, "ENDED").await.unwrap();
        assert_eq!(ended.status, AdStatus::Ended);

        let result = service.update_status(owner.id, ad.id, "ACTIVE").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_paused_ad_leaves_placement(pool: PgPool) {
        let owner = seed_user(&pool, UserRole::Advertiser).await;
        let service = AdvertisementService::new(pool);
        let ad = seed_ad(&service, owner.id).await;

        service.update_status(owner.id, ad.id, "PAUSED").await.unwrap();
        assert!(service.placement("home", "top").await.unwrap().is_none());

        service.update_status(owner.id, ad.id, "ACTIVE").await.unwrap();
        let placed = service.placement("home", "top").await.unwrap();
        assert_eq!(placed.map(|a| a.id), Some(ad.id));
    }
}
