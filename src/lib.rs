#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the authrelay application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod gateway;
pub mod handlers;
pub mod idp;
pub mod models;
pub mod session;
pub mod settings;
pub mod utils;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use gateway::LoginAttempt;
pub use handlers::{
    health, oauth_login, otp_request, otp_verify, password_login, sign_out, userinfo,
};
pub use idp::{IdentityProvider, IdpClient};
pub use models::RelaySession;
pub use session::SessionManager;
pub use settings::RelaySettings;
