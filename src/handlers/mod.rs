// HTTP request handlers for the authentication gateway
pub mod auth;
mod helpers;
pub mod login;
pub mod oauth;
pub mod otp;
pub mod types;

// Re-export the main handler functions
pub use auth::{health, sign_out, userinfo};
pub use login::password_login;
pub use oauth::oauth_login;
pub use otp::{otp_request, otp_verify};
