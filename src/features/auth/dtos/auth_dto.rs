use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::dtos::UserResponseDto;

/// Request DTO for e-mail registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Six-digit code e-mailed by `POST /api/auth/otp`
    #[validate(regex(
        path = "*crate::shared::validation::OTP_REGEX",
        message = "Verification code must be 6 digits"
    ))]
    pub otp: String,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for Google sign-in
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequestDto {
    #[validate(length(min = 1, message = "ID token is required"))]
    pub id_token: String,
}

/// Request DTO carrying only an e-mail (OTP request, existence check)
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct EmailRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmailExistsResponseDto {
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpSentResponseDto {
    /// Seconds until the code expires
    pub expires_in: i64,
}

/// Response DTO for authentication (register/login/google)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    /// Session token to send as `Authorization: Bearer <token>`
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub user: UserResponseDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    #[test]
    fn test_register_validation() {
        let email: String = SafeEmail().fake();
        let valid = RegisterRequestDto {
            email: email.clone(),
            name: "Trần Thị B".to_string(),
            password: "12345678".to_string(),
            otp: "004211".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_otp = RegisterRequestDto {
            otp: "42".to_string(),
            ..valid
        };
        assert!(bad_otp.validate().is_err());

        let short_password = RegisterRequestDto {
            email,
            name: "Trần Thị B".to_string(),
            password: "1234".to_string(),
            otp: "004211".to_string(),
        };
        assert!(short_password.validate().is_err());
    }
}
