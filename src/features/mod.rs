pub mod advertisements;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod dashboard;
pub mod posts;
pub mod reports;
pub mod saved_posts;
pub mod users;
