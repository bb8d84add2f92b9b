//! Stateless encrypted session handling
//!
//! The gateway holds no server-side session store. Sessions, display
//! data, and pending OTP challenges each live in their own encrypted
//! cookie owned by the caller.

pub mod cookie;
pub mod manager;

pub use cookie::{
    create_expired_cookie, CookieFactory, CookieOptions, OTP_COOKIE_NAME, SESSION_COOKIE_NAME,
    USER_COOKIE_NAME,
};
pub use manager::SessionManager;
