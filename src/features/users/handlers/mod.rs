pub mod profile_handler;
pub mod user_handler;
