use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, EmailExistsResponseDto, EmailRequestDto, GoogleLoginRequestDto,
    LoginRequestDto, OtpSentResponseDto, RegisterRequestDto,
};
use crate::features::auth::model::SessionUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Send a registration code to an e-mail address
#[utoipa::path(
    post,
    path = "/api/auth/otp",
    request_body = EmailRequestDto,
    responses(
        (status = 200, description = "Verification code sent", body = ApiResponse<OtpSentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 502, description = "E-mail delivery failed")
    ),
    tag = "auth"
)]
pub async fn request_otp(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<EmailRequestDto>,
) -> Result<Json<ApiResponse<OtpSentResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let expires_in = service.send_otp(&dto.email).await?;
    Ok(Json(ApiResponse::success(
        Some(OtpSentResponseDto { expires_in }),
        Some("Verification code sent".to_string()),
        None,
    )))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error or invalid verification code"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(auth_response), None, None)),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Sign in with a Google ID token
#[utoipa::path(
    post,
    path = "/api/auth/google",
    request_body = GoogleLoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid Google token"),
        (status = 502, description = "Google verification unavailable")
    ),
    tag = "auth"
)]
pub async fn google_login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<GoogleLoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.google_login(&dto.id_token).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Check whether an e-mail is already registered
#[utoipa::path(
    post,
    path = "/api/auth/check-email",
    request_body = EmailRequestDto,
    responses(
        (status = 200, description = "Lookup result", body = ApiResponse<EmailExistsResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn check_email(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<EmailRequestDto>,
) -> Result<Json<ApiResponse<EmailExistsResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let exists = service.email_exists(&dto.email).await?;
    Ok(Json(ApiResponse::success(
        Some(EmailExistsResponseDto { exists }),
        None,
        None,
    )))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<SessionUser>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: SessionUser) -> Result<Json<ApiResponse<SessionUser>>> {
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}
