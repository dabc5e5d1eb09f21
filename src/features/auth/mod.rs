pub mod clients;
pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod password;
pub mod routes;
pub mod services;
mod session;

pub use services::{AuthService, OtpService};
pub use session::SessionTokenService;
