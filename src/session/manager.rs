//! Session Manager - Stateless Encrypted Session Handling
//!
//! Single source of truth for reading and writing the gateway's
//! encrypted cookies. The process keeps no session store: everything a
//! login attempt needs rides in the caller's cookie jar, so independent
//! attempts are isolated by construction and the gateway scales
//! horizontally with no shared state.

use actix_web::HttpRequest;
use anyhow::{anyhow, Result};
use log::debug;

use crate::models::{OtpChallengeData, RelaySession, RelayUserData};
use crate::session::cookie::{
    create_expired_cookie, get_cookie_value, CookieFactory, OTP_COOKIE_NAME, SESSION_COOKIE_NAME,
    USER_COOKIE_NAME,
};
use crate::settings::RelaySettings;
use crate::utils::crypto::{decrypt_data, derive_encryption_key};

#[derive(Clone)]
pub struct SessionManager {
    encryption_key: [u8; 32],
    cookie_secure: bool,
    session_duration_hours: u64,
    otp_challenge_minutes: u64,
    cookie_factory: CookieFactory,
}

impl SessionManager {
    /// Create a new session manager
    #[must_use]
    pub fn new(
        key: &[u8],
        cookie_secure: bool,
        session_duration_hours: u64,
        otp_challenge_minutes: u64,
    ) -> Self {
        let encryption_key = derive_encryption_key(key);

        let cookie_factory = CookieFactory::new(
            encryption_key,
            cookie_secure,
            session_duration_hours,
            otp_challenge_minutes,
        );

        Self {
            encryption_key,
            cookie_secure,
            session_duration_hours,
            otp_challenge_minutes,
            cookie_factory,
        }
    }

    /// Build a manager from loaded settings
    #[must_use]
    pub fn from_settings(settings: &RelaySettings) -> Self {
        Self::new(
            settings.session.session_secret.as_bytes(),
            settings.cookies.secure,
            settings.session.session_duration_hours,
            settings.session.otp_challenge_minutes,
        )
    }

    #[must_use]
    pub fn cookie_factory(&self) -> &CookieFactory {
        &self.cookie_factory
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub fn otp_challenge_minutes(&self) -> u64 {
        self.otp_challenge_minutes
    }

    /// Decrypt the session cookie if present.
    ///
    /// A missing cookie yields `Ok(None)`; an undecryptable one is
    /// treated the same after logging, since a stale or tampered cookie
    /// should read as "not signed in", not as a server fault.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; kept as `Result` so validation
    /// failures can become errors without changing call sites.
    pub fn get_session_from_request(&self, req: &HttpRequest) -> Result<Option<RelaySession>> {
        let Some(value) = get_cookie_value(req, SESSION_COOKIE_NAME) else {
            return Ok(None);
        };

        match decrypt_data::<RelaySession>(&value, &self.encryption_key) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                debug!("discarding undecryptable session cookie: {e}");
                Ok(None)
            }
        }
    }

    /// Extract a valid, unexpired session from the request
    ///
    /// # Errors
    ///
    /// Returns an error if no session cookie is present or the session
    /// has outlived the configured validity window.
    pub fn extract_session(&self, req: &HttpRequest) -> Result<RelaySession> {
        let session = self
            .get_session_from_request(req)?
            .ok_or_else(|| anyhow!("No valid session found"))?;

        if session.is_expired(self.session_duration_hours) {
            return Err(anyhow!("Session expired"));
        }

        Ok(session)
    }

    /// Decrypt the pending OTP challenge cookie if present and still
    /// within its validity window. Anything else reads as "no pending
    /// challenge" — the state machine then reports a sequence violation.
    #[must_use]
    pub fn get_otp_challenge_from_request(&self, req: &HttpRequest) -> Option<OtpChallengeData> {
        let value = get_cookie_value(req, OTP_COOKIE_NAME)?;

        match decrypt_data::<OtpChallengeData>(&value, &self.encryption_key) {
            Ok(challenge) if challenge.is_expired(self.otp_challenge_minutes) => {
                debug!("discarding expired otp challenge for {}", challenge.email);
                None
            }
            Ok(challenge) => Some(challenge),
            Err(e) => {
                debug!("discarding undecryptable otp challenge cookie: {e}");
                None
            }
        }
    }

    /// Create the encrypted session cookie for a freshly issued session
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_session_cookie(
        &self,
        session: &RelaySession,
    ) -> Result<actix_web::cookie::Cookie<'static>> {
        self.cookie_factory.create_session_cookie(session)
    }

    /// Create the companion user data cookie (display data, no token)
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_user_cookie(
        &self,
        user_data: &RelayUserData,
    ) -> Result<actix_web::cookie::Cookie<'static>> {
        self.cookie_factory.create_user_cookie(user_data)
    }

    /// Create the short-lived OTP challenge cookie
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_otp_cookie(
        &self,
        challenge: &OtpChallengeData,
    ) -> Result<actix_web::cookie::Cookie<'static>> {
        self.cookie_factory.create_otp_cookie(challenge)
    }

    /// Expired cookie that clears the session on the client
    #[must_use]
    pub fn create_expired_session_cookie(&self) -> actix_web::cookie::Cookie<'static> {
        create_expired_cookie(SESSION_COOKIE_NAME, self.cookie_secure)
    }

    /// Expired cookie that clears the user data on the client
    #[must_use]
    pub fn create_expired_user_cookie(&self) -> actix_web::cookie::Cookie<'static> {
        create_expired_cookie(USER_COOKIE_NAME, self.cookie_secure)
    }

    /// Expired cookie that clears a pending OTP challenge on the client
    #[must_use]
    pub fn create_expired_otp_cookie(&self) -> actix_web::cookie::Cookie<'static> {
        create_expired_cookie(OTP_COOKIE_NAME, self.cookie_secure)
    }
}
