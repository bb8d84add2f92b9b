//! Test fixtures providing pre-built test objects
//!
//! Commonly used test data and configurations, eliminating the need to
//! recreate the same objects across test files.

use chrono::{Duration, Utc};

use crate::models::{OtpChallengeData, RelaySession, VerifiedIdentity};
use crate::session::SessionManager;
use crate::settings::RelaySettings;

use super::constants::{TEST_EMAIL, TEST_SECRET, TEST_TOKEN, TEST_USERNAME};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Settings with a fixed secret and insecure cookies for test requests
    #[must_use]
    pub fn settings() -> RelaySettings {
        let mut settings = RelaySettings::default();
        settings.session.session_secret = TEST_SECRET.to_string();
        settings.cookies.secure = false;
        settings
    }

    /// Session manager with the default test configuration
    #[must_use]
    pub fn session_manager() -> SessionManager {
        SessionManager::from_settings(&Self::settings())
    }

    /// A verified identity as the password path produces it
    #[must_use]
    pub fn password_identity() -> VerifiedIdentity {
        VerifiedIdentity {
            subject_id: TEST_USERNAME.to_string(),
            display_name: TEST_USERNAME.to_string(),
            token: TEST_TOKEN.to_string(),
        }
    }

    /// A verified identity as the OTP path produces it
    #[must_use]
    pub fn otp_identity() -> VerifiedIdentity {
        VerifiedIdentity {
            subject_id: TEST_EMAIL.to_string(),
            display_name: TEST_EMAIL.to_string(),
            token: TEST_TOKEN.to_string(),
        }
    }

    /// A freshly issued session
    #[must_use]
    pub fn session() -> RelaySession {
        RelaySession {
            subject_id: TEST_USERNAME.to_string(),
            backend_token: TEST_TOKEN.to_string(),
            display_name: TEST_USERNAME.to_string(),
            provider: "password".to_string(),
            authenticated_at: Utc::now(),
        }
    }

    /// A session past the default validity window
    #[must_use]
    pub fn expired_session() -> RelaySession {
        let mut session = Self::session();
        session.authenticated_at = Utc::now() - Duration::hours(25);
        session
    }

    /// A pending OTP challenge for the standard test email
    #[must_use]
    pub fn otp_challenge() -> OtpChallengeData {
        OtpChallengeData::new(TEST_EMAIL.to_string())
    }
}
