//! Accounts and profiles.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users` | List accounts (admin) |
//! | POST | `/api/users` | Create an account (admin) |
//! | PATCH | `/api/users/{id}` | Change role (admin) |
//! | DELETE | `/api/users/{id}` | Delete account (admin) |
//! | GET | `/api/me/profile` | Own profile |
//! | PUT | `/api/me/profile` | Update own profile |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
