mod post_dto;

pub use post_dto::{
    CreatePostDto, PostQueryParams, PostResponseDto, PostSummaryDto, UpdatePostDto,
};
