pub mod auth_handler;

pub use auth_handler::{
    __path_check_email, __path_get_me, __path_google_login, __path_login, __path_register,
    __path_request_otp, check_email, get_me, google_login, login, register, request_otp,
};
