mod user_dto;

pub use user_dto::{
    CreateUserDto, ProfileResponseDto, UpdateProfileDto, UpdateRoleDto, UserQueryParams,
    UserResponseDto,
};
