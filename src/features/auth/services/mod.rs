mod auth_service;
mod otp_service;

pub use auth_service::AuthService;
pub use otp_service::OtpService;
