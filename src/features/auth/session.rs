use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::SessionUser;
use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::users::models::UserRole;

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Uuid,
    name: String,
    role: UserRole,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 session tokens
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    leeway: u64,
}

impl SessionTokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: config.token_ttl,
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    /// Token lifetime in seconds, as reported to clients in `expiresIn`
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.as_secs() as i64
    }

    pub fn issue(&self, user: &SessionUser) -> Result<String> {
        let now = Utc::now().timestamp();
        self.encode_claims(&SessionClaims {
            sub: user.id,
            name: user.name.clone(),
            role: user.role,
            iat: now,
            exp: now + self.ttl_secs(),
        })
    }

    fn encode_claims(&self, claims: &SessionClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign session token: {:?}", e);
            AppError::Internal("Failed to sign session token".to_string())
        })
    }

    pub fn verify(&self, token: &str) -> Result<SessionUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(SessionUser {
            id: data.claims.sub,
            name: data.claims.name,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SessionTokenService {
        SessionTokenService::new(&AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
            bcrypt_cost: 4,
            otp_ttl: Duration::from_secs(300),
        })
    }

    fn moderator() -> SessionUser {
        SessionUser {
            id: Uuid::now_v7(),
            name: "Kiểm duyệt viên".to_string(),
            role: UserRole::Moderator,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = service();
        let user = moderator();
        let token = tokens.issue(&user).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), user);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        let user = moderator();
        let past = Utc::now().timestamp() - 7200;
        let token = tokens
            .encode_claims(&SessionClaims {
                sub: user.id,
                name: user.name,
                role: user.role,
                iat: past,
                exp: past + 60,
            })
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = service();
        let token = tokens.issue(&moderator()).unwrap();

        let other = SessionTokenService::new(&AuthConfig {
            jwt_secret: "ffffffffffffffffffffffffffffffff".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
            bcrypt_cost: 4,
            otp_ttl: Duration::from_secs(300),
        });
        assert!(other.verify(&token).is_err());
        assert!(tokens.verify("not-a-token").is_err());
    }
}
