mod comment_dto;

pub use comment_dto::{
    AdminCommentDto, CommentQueryParams, CommentResponseDto, CreateCommentDto,
    ModerateCommentDto, PublicCommentDto,
};
