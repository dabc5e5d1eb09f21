use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::advertisements::dtos::{
    AdStatsDto, AdvertisementQueryParams, AdvertisementResponseDto, CreateAdvertisementDto,
    PlacementQuery, UpdateAdStatusDto,
};
use crate::features::advertisements::models::CreateAdvertisement;
use crate::features::advertisements::services::{AdMetricService, AdvertisementService};
use crate::features::auth::guards::RequireAdvertiser;
use crate::shared::types::{ApiResponse, Meta};

#[derive(Clone)]
pub struct AdState {
    pub ad_service: Arc<AdvertisementService>,
    pub metric_service: Arc<AdMetricService>,
}

/// List advertisements (advertiser or admin)
#[utoipa::path(
    get,
    path = "/api/advertisements",
    params(AdvertisementQueryParams),
    responses(
        (status = 200, description = "List of advertisements", body = ApiResponse<Vec<AdvertisementResponseDto>>),
        (status = 401, description = "Unauthorized - Advertiser access required")
    ),
    tag = "advertisements",
    security(("bearer_auth" = []))
)]
pub async fn list_advertisements(
    RequireAdvertiser(_user): RequireAdvertiser,
    State(state): State<AdState>,
    Query(params): Query<AdvertisementQueryParams>,
) -> Result<Json<ApiResponse<Vec<AdvertisementResponseDto>>>> {
    let (ads, total) = state.ad_service.list(&params).await?;
    let dtos = ads.into_iter().map(AdvertisementResponseDto::from).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(Meta { total }))))
}

/// Create an advertisement. It goes live immediately.
#[utoipa::path(
    post,
    path = "/api/advertisements",
    request_body = CreateAdvertisementDto,
    responses(
        (status = 201, description = "Advertisement created", body = ApiResponse<AdvertisementResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized - Advertiser access required")
    ),
    tag = "advertisements",
    security(("bearer_auth" = []))
)]
pub async fn create_advertisement(
    RequireAdvertiser(user): RequireAdvertiser,
    State(state): State<AdState>,
    AppJson(dto): AppJson<CreateAdvertisementDto>,
) -> Result<(StatusCode, Json<ApiResponse<AdvertisementResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ad = state
        .ad_service
        .create(CreateAdvertisement {
            title: dto.title,
            description: dto.description,
            image_url: dto.image_url,
            target_url: dto.target_url,
            position: dto.position,
            display_place: dto.display_place,
            created_by: user.id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(ad.into()),
            Some("Advertisement created".to_string()),
            None,
        )),
    ))
}

/// Pause, resume or end a campaign
#[utoipa::path(
    patch,
    path = "/api/advertisements/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Advertisement ID")
    ),
    request_body = UpdateAdStatusDto,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<AdvertisementResponseDto>),
        (status = 400, description = "Status must be ACTIVE, PAUSED or ENDED"),
        (status = 401, description = "Unauthorized - Advertiser access required"),
        (status = 404, description = "Advertisement not found"),
        (status = 409, description = "Ended advertisements cannot be re-activated")
    ),
    tag = "advertisements",
    security(("bearer_auth" = []))
)]
pub async fn update_advertisement_status(
    RequireAdvertiser(user): RequireAdvertiser,
    State(state): State<AdState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateAdStatusDto>,
) -> Result<Json<ApiResponse<AdvertisementResponseDto>>> {
    let ad = state
        .ad_service
        .update_status(user.id, id, &dto.status)
        .await?;
    Ok(Json(ApiResponse::success(Some(ad.into()), None, None)))
}

/// Impressions, clicks and CTR of an advertisement
#[utoipa::path(
    get,
    path = "/api/advertisements/{id}/stats",
    params(
        ("id" = Uuid, Path, description = "Advertisement ID")
    ),
    responses(
        (status = 200, description = "Aggregated metrics", body = ApiResponse<AdStatsDto>),
        (status = 401, description = "Unauthorized - Advertiser access required"),
        (status = 404, description = "No metrics recorded")
    ),
    tag = "advertisements",
    security(("bearer_auth" = []))
)]
pub async fn advertisement_stats(
    RequireAdvertiser(_user): RequireAdvertiser,
    State(state): State<AdState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdStatsDto>>> {
    let stats = state.metric_service.stats(id).await?;
    Ok(Json(ApiResponse::success(Some(stats.into()), None, None)))
}

/// Pick an active advertisement for a page slot
#[utoipa::path(
    get,
    path = "/api/advertisements/placement",
    params(PlacementQuery),
    responses(
        (status = 200, description = "An advertisement, or null when the slot is empty", body = ApiResponse<AdvertisementResponseDto>)
    ),
    tag = "advertisements"
)]
pub async fn advertisement_placement(
    State(state): State<AdState>,
    Query(query): Query<PlacementQuery>,
) -> Result<Json<ApiResponse<AdvertisementResponseDto>>> {
    let ad = state
        .ad_service
        .placement(&query.display_place, &query.position)
        .await?;
    Ok(Json(ApiResponse::success(ad.map(Into::into), None, None)))
}
