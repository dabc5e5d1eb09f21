mod saved_post_handler;

pub use saved_post_handler::*;
