//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for services outside the database, currently outgoing mail.

pub mod mailer;
