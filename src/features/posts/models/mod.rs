mod post;

pub use post::{can_view, check_edit, Post, PostStatus, PostSummary};
