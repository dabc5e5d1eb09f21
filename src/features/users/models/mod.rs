mod profile;
mod user;

pub use profile::{Gender, ProfileView};
pub use user::{CreateUser, User, UserRole};
