use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::guards::RequireStaff;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Site-wide counters and activity of the last months
#[utoipa::path(
    get,
    path = "/api/dashboard/overview",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard overview", body = ApiResponse<DashboardOverviewDto>),
        (status = 401, description = "Unauthorized - Staff access required"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_overview(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardOverviewDto>>, AppError> {
    let overview = service.overview().await?;
    Ok(Json(ApiResponse::success(Some(overview), None, None)))
}
