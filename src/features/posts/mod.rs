//! News articles.
//!
//! Readers see PUBLISHED posts only. Authors submit DRAFT or PENDING posts;
//! editors and admins publish, archive and soft-delete them.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PostService;
