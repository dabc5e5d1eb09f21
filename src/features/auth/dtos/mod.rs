mod auth_dto;

pub use auth_dto::{
    AuthResponseDto, EmailExistsResponseDto, EmailRequestDto, GoogleLoginRequestDto,
    LoginRequestDto, OtpSentResponseDto, RegisterRequestDto,
};
