//! E-mail bodies rendered with Jinja2 templates.
//!
//! Templates are compiled into the binary from `templates/email/`.

use minijinja::{context, Environment};
use std::sync::OnceLock;

use crate::core::error::{AppError, Result};

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const SITE_NAME: &str = "Tin Tức";

fn environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        for (name, source) in [
            ("otp.html", include_str!("../../../templates/email/otp.html.jinja")),
            ("otp.txt", include_str!("../../../templates/email/otp.txt.jinja")),
        ] {
            if let Err(e) = env.add_template(name, source) {
                tracing::error!("Failed to load e-mail template {}: {}", name, e);
            }
        }
        env
    })
}

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    environment()
        .get_template(name)
        .and_then(|t| t.render(ctx))
        .map_err(|e| {
            tracing::error!("Failed to render e-mail template {}: {}", name, e);
            AppError::Internal(format!("Failed to render e-mail template {}", name))
        })
}

/// Rendered subject and bodies of one e-mail
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Registration code e-mail
pub fn otp_email(code: &str, ttl_minutes: u64) -> Result<EmailContent> {
    let ctx = context! { site_name => SITE_NAME, code => code, ttl_minutes => ttl_minutes };
    Ok(EmailContent {
        subject: format!("[{}] Mã xác thực đăng ký", SITE_NAME),
        text: render("otp.txt", ctx.clone())?,
        html: render("otp.html", ctx)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_email_contains_code() {
        let email = otp_email("482913", 5).unwrap();
        assert!(email.html.contains("482913"));
        assert!(email.text.contains("482913"));
        assert!(email.text.contains("5 phút"));
        assert!(email.subject.contains("Mã xác thực"));
    }
}
