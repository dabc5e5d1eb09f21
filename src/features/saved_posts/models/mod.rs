mod saved_post;

pub use saved_post::{SaveOutcome, SavedPost};
