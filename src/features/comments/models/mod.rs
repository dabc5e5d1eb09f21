mod comment;

pub use comment::{Comment, CommentStatus, CommentWithContext, PublicComment};
