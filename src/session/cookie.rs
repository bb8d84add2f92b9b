use actix_web::cookie::Cookie;
use actix_web::HttpRequest;
use anyhow::Result;
use serde::Serialize;

use crate::models::{OtpChallengeData, RelaySession, RelayUserData};
use crate::utils::crypto::encrypt_data;

/// Common cookie names used across the application
pub const SESSION_COOKIE_NAME: &str = "authrelay_session";
pub const USER_COOKIE_NAME: &str = "authrelay_user";
pub const OTP_COOKIE_NAME: &str = "authrelay_otp";

/// Options for cookie creation
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: actix_web::cookie::SameSite,
    pub path: String,
    pub max_age: actix_web::cookie::time::Duration,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: true,
            same_site: actix_web::cookie::SameSite::Strict,
            path: "/".to_string(),
            max_age: actix_web::cookie::time::Duration::hours(24),
        }
    }
}

/// Cookie factory for creating encrypted cookies with proper configuration
///
/// Centralizes cookie creation for the three cookies the gateway issues:
/// the session, the display-only user data, and the pending OTP
/// challenge.
#[derive(Clone)]
pub struct CookieFactory {
    encryption_key: [u8; 32],
    cookie_secure: bool,
    session_duration_hours: u64,
    otp_challenge_minutes: u64,
}

impl CookieFactory {
    /// Create a new cookie factory with the specified configuration
    #[must_use]
    pub fn new(
        encryption_key: [u8; 32],
        cookie_secure: bool,
        session_duration_hours: u64,
        otp_challenge_minutes: u64,
    ) -> Self {
        Self {
            encryption_key,
            cookie_secure,
            session_duration_hours,
            otp_challenge_minutes,
        }
    }

    /// Generic method to create a cookie with encrypted data
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_cookie<T: Serialize>(
        &self,
        name: &str,
        data: Option<&T>,
        options: CookieOptions,
    ) -> Result<Cookie<'static>> {
        let value = match data {
            Some(data) => encrypt_data(data, &self.encryption_key)?,
            None => String::new(),
        };

        Ok(Cookie::build(name.to_owned(), value)
            .http_only(options.http_only)
            .secure(self.cookie_secure && options.secure)
            .same_site(options.same_site)
            .path(options.path)
            .max_age(options.max_age)
            .finish())
    }

    /// Create an encrypted session cookie from a `RelaySession`
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_session_cookie(&self, session: &RelaySession) -> Result<Cookie<'static>> {
        self.create_cookie(
            SESSION_COOKIE_NAME,
            Some(session),
            CookieOptions {
                same_site: actix_web::cookie::SameSite::Lax,
                max_age: actix_web::cookie::time::Duration::hours(
                    i64::try_from(self.session_duration_hours).unwrap_or(24),
                ),
                ..Default::default()
            },
        )
    }

    /// Create an encrypted user data cookie from `RelayUserData`
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_user_cookie(&self, user_data: &RelayUserData) -> Result<Cookie<'static>> {
        self.create_cookie(
            USER_COOKIE_NAME,
            Some(user_data),
            CookieOptions {
                same_site: actix_web::cookie::SameSite::Lax,
                max_age: actix_web::cookie::time::Duration::hours(
                    i64::try_from(self.session_duration_hours).unwrap_or(24),
                ),
                ..Default::default()
            },
        )
    }

    /// Create the short-lived encrypted OTP challenge cookie
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_otp_cookie(&self, challenge: &OtpChallengeData) -> Result<Cookie<'static>> {
        self.create_cookie(
            OTP_COOKIE_NAME,
            Some(challenge),
            CookieOptions {
                max_age: actix_web::cookie::time::Duration::minutes(
                    i64::try_from(self.otp_challenge_minutes).unwrap_or(10),
                ),
                ..Default::default()
            },
        )
    }
}

/// Create an expired cookie to clear a named cookie on the client
#[must_use]
pub fn create_expired_cookie(name: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(name.to_owned(), String::new())
        .http_only(true)
        .secure(secure)
        .same_site(actix_web::cookie::SameSite::Lax)
        .path("/")
        .max_age(actix_web::cookie::time::Duration::ZERO)
        .finish()
}

/// Read a named cookie's raw value from a request
#[must_use]
pub fn get_cookie_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.cookie(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::crypto::derive_encryption_key;
    use chrono::Utc;

    fn factory() -> CookieFactory {
        let key = derive_encryption_key(b"test-secret-key-that-is-32-chars!");
        CookieFactory::new(key, true, 24, 10)
    }

    #[test]
    fn test_session_cookie_attributes() {
        let session = RelaySession {
            subject_id: "alice".to_string(),
            backend_token: "token".to_string(),
            display_name: "alice".to_string(),
            provider: "password".to_string(),
            authenticated_at: Utc::now(),
        };

        let cookie = factory().create_session_cookie(&session).unwrap();
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        // Value is encrypted, not the raw serialization
        assert!(!cookie.value().contains("token"));
    }

    #[test]
    fn test_otp_cookie_is_short_lived() {
        let challenge = OtpChallengeData::new("alice@example.com".to_string());
        let cookie = factory().create_otp_cookie(&challenge).unwrap();

        assert_eq!(cookie.name(), OTP_COOKIE_NAME);
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::minutes(10))
        );
    }

    #[test]
    fn test_expired_cookie_clears() {
        let cookie = create_expired_cookie(SESSION_COOKIE_NAME, true);
        assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
        assert!(cookie.value().is_empty());
    }

    #[test]
    fn test_insecure_factory_honours_setting() {
        let key = derive_encryption_key(b"test-secret-key-that-is-32-chars!");
        let factory = CookieFactory::new(key, false, 24, 10);
        let challenge = OtpChallengeData::new("alice@example.com".to_string());

        let cookie = factory.create_otp_cookie(&challenge).unwrap();
        assert_eq!(cookie.secure(), Some(false));
    }
}
