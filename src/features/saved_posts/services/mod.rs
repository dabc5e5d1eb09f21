mod saved_post_service;

pub use saved_post_service::SavedPostService;
