use crate::core::error::{AppError, Result};
use crate::features::auth::clients::GoogleClient;
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::model::SessionUser;
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::services::OtpService;
use crate::features::auth::session::SessionTokenService;
use crate::features::users::models::{CreateUser, User, UserRole};
use crate::features::users::UserService;
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Service for authentication operations (register, login, Google sign-in)
pub struct AuthService {
    users: Arc<UserService>,
    otp: Arc<OtpService>,
    tokens: Arc<SessionTokenService>,
    google: Arc<GoogleClient>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<UserService>,
        otp: Arc<OtpService>,
        tokens: Arc<SessionTokenService>,
        google: Arc<GoogleClient>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            otp,
            tokens,
            google,
            bcrypt_cost,
        }
    }

    pub async fn send_otp(&self, email: &str) -> Result<i64> {
        if self.users.email_exists(email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        self.otp.send(email).await?;
        Ok(self.otp.ttl_secs())
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.users.email_exists(email).await
    }

    /// Register a new reader account after checking the e-mailed code
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        if self.users.email_exists(&dto.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        self.otp.consume(&dto.email, &dto.otp).await?;

        let password_hash = hash_password(dto.password, self.bcrypt_cost).await?;
        let user = self
            .users
            .insert(CreateUser {
                name: dto.name.trim().to_string(),
                email: dto.email,
                password_hash: Some(password_hash),
                role: UserRole::User,
                avatar: None,
                google_id: None,
            })
            .await?;

        self.session_for(user)
    }

    /// Login with email and password
    ///
    /// Unknown e-mail, wrong password and Google-only accounts all fail the same way.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .users
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let Some(hash) = user.password_hash.clone() else {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(dto.password, hash).await? {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        tracing::info!("User {} logged in", user.id);
        self.session_for(user)
    }

    /// Sign in with a Google ID token, linking or creating the account as needed
    pub async fn google_login(&self, id_token: &str) -> Result<AuthResponseDto> {
        let identity = self.google.verify_id_token(id_token).await?;

        let user = match self.users.find_by_google_id(&identity.google_id).await? {
            Some(user) => user,
            None => match self.users.find_by_email(&identity.email).await? {
                Some(existing) => {
                    tracing::info!("Linking Google account to user {}", existing.id);
                    self.users
                        .link_google_id(existing.id, &identity.google_id)
                        .await?
                }
                None => {
                    self.users
                        .insert(CreateUser {
                            name: identity.name,
                            email: identity.email,
                            password_hash: None,
                            role: UserRole::User,
                            avatar: identity.picture,
                            google_id: Some(identity.google_id),
                        })
                        .await?
                }
            },
        };

        self.session_for(user)
    }

    fn session_for(&self, user: User) -> Result<AuthResponseDto> {
        let session = SessionUser {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
        };
        let access_token = self.tokens.issue(&session)?;

        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.ttl_secs(),
            user: user.into(),
        })
    }
}
