use crate::core::config::GoogleConfig;
use crate::core::error::{AppError, Result};
use serde::Deserialize;

/// Body of Google's `tokeninfo` endpoint for an ID token
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfoResponse {
    pub aud: String,
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Google sends `"true"`/`"false"` as strings here
    #[serde(default)]
    pub email_verified: serde_json::Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Identity extracted from a verified Google ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

impl TokenInfoResponse {
    fn email_verified(&self) -> bool {
        match &self.email_verified {
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::String(s) => s == "true",
            _ => false,
        }
    }

    /// Check audience and e-mail verification, then extract the identity
    pub fn into_identity(self, client_id: &str) -> Result<GoogleIdentity> {
        if self.aud != client_id {
            tracing::warn!("Google token issued for another client: {}", self.aud);
            return Err(AppError::Unauthorized("Invalid Google token".to_string()));
        }
        if !self.email_verified() {
            return Err(AppError::Unauthorized(
                "Google account e-mail is not verified".to_string(),
            ));
        }

        let email = self
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Google token carries no e-mail".to_string()))?;

        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        Ok(GoogleIdentity {
            google_id: self.sub,
            email,
            name,
            picture: self.picture,
        })
    }
}

/// Client for verifying Google sign-in ID tokens
pub struct GoogleClient {
    config: GoogleConfig,
    http_client: reqwest::Client,
}

impl GoogleClient {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdentity> {
        let client_id = self.config.client_id.as_deref().ok_or_else(|| {
            AppError::BadRequest("Google sign-in is not configured".to_string())
        })?;

        let response = self
            .http_client
            .get(&self.config.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Google tokeninfo: {}", e);
                AppError::ExternalServiceError(format!("Failed to verify Google token: {}", e))
            })?;

        let status = response.status();
        if status.is_client_error() {
            tracing::debug!("Google rejected ID token: HTTP {}", status);
            return Err(AppError::Unauthorized("Invalid Google token".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Google tokeninfo error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Google tokeninfo returned HTTP {}",
                status
            )));
        }

        let info = response.json::<TokenInfoResponse>().await.map_err(|e| {
            tracing::error!("Failed to parse Google tokeninfo response: {}", e);
            AppError::ExternalServiceError(format!("Failed to parse Google response: {}", e))
        })?;

        info.into_identity(client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info(aud: &str, verified: serde_json::Value) -> TokenInfoResponse {
        serde_json::from_value(json!({
            "aud": aud,
            "sub": "109876543210",
            "email": "doc.gia@gmail.com",
            "email_verified": verified,
            "name": "Độc Giả",
            "picture": "https://lh3.googleusercontent.com/a/photo"
        }))
        .unwrap()
    }

    #[test]
    fn test_identity_from_valid_token() {
        let identity = info("client-1", json!("true")).into_identity("client-1").unwrap();
        assert_eq!(identity.google_id, "109876543210");
        assert_eq!(identity.email, "doc.gia@gmail.com");
        assert_eq!(identity.name, "Độc Giả");
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let err = info("other-client", json!(true))
            .into_identity("client-1")
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_unverified_email_rejected() {
        assert!(info("client-1", json!("false")).into_identity("client-1").is_err());
    }

    #[test]
    fn test_missing_name_falls_back_to_mailbox() {
        let mut token = info("client-1", json!(true));
        token.name = None;
        assert_eq!(token.into_identity("client-1").unwrap().name, "doc.gia");
    }
}
