use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::mailer::{templates, Mailer};
use crate::shared::constants::{OTP_LENGTH, OTP_MAX_ATTEMPTS};
use crate::shared::validation::normalize_email;

/// Random zero-padded numeric code
fn generate_code() -> String {
    let upper = 10u32.pow(OTP_LENGTH as u32);
    let n = rand::thread_rng().gen_range(0..upper);
    format!("{:0width$}", n, width = OTP_LENGTH)
}

/// Codes are stored hashed, bound to the address they were sent to
fn hash_code(email: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// E-mailed one-time codes that gate registration
pub struct OtpService {
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
    ttl: Duration,
}

impl OtpService {
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>, ttl: Duration) -> Self {
        Self { pool, mailer, ttl }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.as_secs() as i64
    }

    /// Issue a fresh code for `email`, replacing any outstanding one, and mail it
    pub async fn send(&self, email: &str) -> Result<()> {
        let email = normalize_email(email);
        let code = generate_code();
        let expires_at = Utc::now() + chrono::Duration::seconds(self.ttl_secs());

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query(
            "UPDATE email_otps SET consumed_at = NOW() WHERE email = $1 AND consumed_at IS NULL",
        )
        .bind(&email)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to invalidate previous codes: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query(
            r#"
            INSERT INTO email_otps (id, email, code_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&email)
        .bind(hash_code(&email, &code))
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store verification code: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit verification code: {:?}", e);
            AppError::Database(e)
        })?;

        let content = templates::otp_email(&code, self.ttl.as_secs().div_ceil(60))?;
        self.mailer.send(&email, content).await?;

        tracing::info!("Sent verification code to {}", email);
        Ok(())
    }

    /// Mark the matching unexpired code as used. Each code works once.
    ///
    /// A wrong guess counts against the live code of the address, and the
    /// code is burned after `OTP_MAX_ATTEMPTS` misses.
    pub async fn consume(&self, email: &str, code: &str) -> Result<()> {
        let email = normalize_email(email);

        let consumed = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE email_otps SET consumed_at = NOW()
            WHERE id = (
                SELECT id FROM email_otps
                WHERE email = $1 AND code_hash = $2
                  AND consumed_at IS NULL AND expires_at > NOW()
                ORDER BY created_at DESC
                LIMIT 1
            )
            RETURNING id
            "#,
        )
        .bind(&email)
        .bind(hash_code(&email, code))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to verify code: {:?}", e);
            AppError::Database(e)
        })?;

        if consumed.is_some() {
            return Ok(());
        }

        let burned = sqlx::query_scalar::<_, bool>(
            r#"
            UPDATE email_otps
            SET attempts = attempts + 1,
                consumed_at = CASE WHEN attempts + 1 >= $2 THEN NOW() ELSE consumed_at END
            WHERE email = $1 AND consumed_at IS NULL AND expires_at > NOW()
            RETURNING consumed_at IS NOT NULL
            "#,
        )
        .bind(&email)
        .bind(OTP_MAX_ATTEMPTS)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record failed code attempt: {:?}", e);
            AppError::Database(e)
        })?;

        if burned.iter().any(|b| *b) {
            tracing::warn!("Verification code for {} burned after too many attempts", email);
        }

        Err(AppError::BadRequest(
            "Invalid or expired verification code".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::OTP_REGEX;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert!(OTP_REGEX.is_match(&code), "bad code {}", code);
        }
    }

    struct SilentMailer;

    #[async_trait::async_trait]
    impl Mailer for SilentMailer {
        async fn send(&self, _to: &str, _content: crate::modules::mailer::EmailContent) -> Result<()> {
            Ok(())
        }
    }

    fn service(pool: PgPool) -> OtpService {
        OtpService::new(pool, Arc::new(SilentMailer), Duration::from_secs(300))
    }

    async fn issue(pool: &PgPool, email: &str, code: &str) {
        sqlx::query(
            "INSERT INTO email_otps (id, email, code_hash, expires_at) VALUES ($1, $2, $3, NOW() + INTERVAL '5 minutes')",
        )
        .bind(Uuid::now_v7())
        .bind(email)
        .bind(hash_code(email, code))
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_code_works_once(pool: PgPool) {
        issue(&pool, "lan@example.com", "123456").await;
        let otp = service(pool);

        otp.consume("Lan@Example.com", "123456").await.unwrap();
        assert!(matches!(
            otp.consume("lan@example.com", "123456").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_code_burned_after_max_wrong_guesses(pool: PgPool) {
        issue(&pool, "lan@example.com", "123456").await;
        let otp = service(pool.clone());

        for guess in 0..OTP_MAX_ATTEMPTS {
            let wrong = format!("{:06}", 900000 + guess);
            assert!(otp.consume("lan@example.com", &wrong).await.is_err());
        }

        let attempts: i32 =
            sqlx::query_scalar("SELECT attempts FROM email_otps WHERE email = 'lan@example.com'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(attempts, OTP_MAX_ATTEMPTS);

        // The right code no longer helps once the limit is hit.
        assert!(matches!(
            otp.consume("lan@example.com", "123456").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_right_code_after_a_few_misses(pool: PgPool) {
        issue(&pool, "lan@example.com", "123456").await;
        let otp = service(pool);

        for wrong in ["000000", "111111"] {
            assert!(otp.consume("lan@example.com", wrong).await.is_err());
        }
        otp.consume("lan@example.com", "123456").await.unwrap();
    }

    #[test]
    fn test_hash_binds_email_and_code() {
        let a = hash_code("a@example.com", "123456");
        assert_eq!(a.len(), 64);
        assert_eq!(a, hash_code("a@example.com", "123456"));
        assert_ne!(a, hash_code("b@example.com", "123456"));
        assert_ne!(a, hash_code("a@example.com", "123457"));
    }
}
