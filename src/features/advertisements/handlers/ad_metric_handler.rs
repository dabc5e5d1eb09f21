use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::advertisements::dtos::RecordMetricDto;
use crate::features::advertisements::handlers::AdState;
use crate::features::advertisements::models::AdMetricType;
use crate::shared::types::ApiResponse;

/// Record an ad impression
#[utoipa::path(
    post,
    path = "/api/ad-metrics/impression",
    request_body = RecordMetricDto,
    responses(
        (status = 200, description = "Impression recorded"),
        (status = 400, description = "Missing or malformed adId")
    ),
    tag = "ad-metrics"
)]
pub async fn record_impression(
    State(state): State<AdState>,
    AppJson(dto): AppJson<RecordMetricDto>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .metric_service
        .record(dto.ad_id, AdMetricType::Impression)
        .await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}

/// Record an ad click
#[utoipa::path(
    post,
    path = "/api/ad-metrics/click",
    request_body = RecordMetricDto,
    responses(
        (status = 200, description = "Click recorded"),
        (status = 400, description = "Missing or malformed adId")
    ),
    tag = "ad-metrics"
)]
pub async fn record_click(
    State(state): State<AdState>,
    AppJson(dto): AppJson<RecordMetricDto>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .metric_service
        .record(dto.ad_id, AdMetricType::Click)
        .await?;
    Ok(Json(ApiResponse::success(None, None, None)))
}
