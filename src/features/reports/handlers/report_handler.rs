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
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::SessionUser;
use crate::features::reports::dtos::{
    CreateReportDto, ReportDetailDto, ReportQueryParams, ReportResponseDto, ResolveReportDto,
    ResolveReportResponseDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// Report a post or a comment
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report filed", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Blank reason or not exactly one target"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Reported content not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn create_report(
    user: SessionUser,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// List reports (staff)
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportQueryParams),
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized - Staff access required")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn list_reports(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<ReportService>>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = service.list(&params).await?;
    let dtos = reports.into_iter().map(ReportResponseDto::from).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(Meta { total }))))
}

/// Get a report by ID (staff)
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report with the reported content", body = ApiResponse<ReportDetailDto>),
        (status = 401, description = "Unauthorized - Staff access required"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn get_report(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportDetailDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Resolve a report, optionally hiding the reported content (staff)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = ResolveReportDto,
    responses(
        (status = 200, description = "Updated report plus whether its content was hidden", body = ApiResponse<ResolveReportResponseDto>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized - Staff access required"),
        (status = 404, description = "Report or reported content not found")
    ),
    tag = "reports",
    security(("bearer_auth" = []))
)]
pub async fn resolve_report(
    RequireStaff(staff): RequireStaff,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ResolveReportDto>,
) -> Result<Json<ApiResponse<ResolveReportResponseDto>>> {
    let resolution = service.resolve(&staff, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(ResolveReportResponseDto {
            report: resolution.report.into(),
            content_hidden: resolution.content_hidden,
        }),
        None,
        None,
    )))
}
