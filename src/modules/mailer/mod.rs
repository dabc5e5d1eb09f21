//! Outgoing e-mail
//!
//! `Mailer` is the seam services depend on; `SmtpMailer` is the production
//! implementation backed by lettre.

mod smtp_mailer;
pub mod templates;

use async_trait::async_trait;

use crate::core::error::Result;

pub use smtp_mailer::SmtpMailer;
pub use templates::EmailContent;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, content: EmailContent) -> Result<()>;
}
