mod saved_post_dto;

pub use saved_post_dto::{SavePostDto, SavedPostDto, SavedStatusDto};
