use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub mod auth;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// One credential submission, valid for the duration of a single login
/// attempt. The variant determines which upstream IdP endpoint is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Password {
        username: String,
        password: String,
    },
    OtpRequest {
        email: String,
    },
    OtpVerify {
        email: String,
        code: String,
    },
    OAuthAssertion(OAuthAssertion),
}

impl Credential {
    /// Short tag used in logs and as the session provider label
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::Password { .. } => "password",
            Credential::OtpRequest { .. } | Credential::OtpVerify { .. } => "otp",
            Credential::OAuthAssertion(_) => "oauth",
        }
    }
}

/// Identity assertion produced by a third-party OAuth sign-in.
///
/// Token material and expiry are each independently optional; absent
/// fields are omitted from the upstream request body entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthAssertion {
    pub provider: String,
    pub subject_email: String,
    pub display_name: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}

/// Result of a successful credential check: the minimum data needed to
/// construct a session. The token is the opaque string issued by the
/// upstream IdP and is never parsed locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject_id: String,
    pub display_name: String,
    pub token: String,
}

/// Session structure carried in the encrypted `authrelay_session` cookie.
/// The backend token is the bearer credential for the upstream IdP;
/// display data is stored separately in the `authrelay_user` cookie.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RelaySession {
    pub subject_id: String,
    pub backend_token: String,
    pub display_name: String,
    pub provider: String,
    pub authenticated_at: DateTime<Utc>,
}

impl RelaySession {
    /// Check whether the session has outlived the configured validity window
    #[must_use]
    pub fn is_expired(&self, session_duration_hours: u64) -> bool {
        let lifetime = Duration::hours(i64::try_from(session_duration_hours).unwrap_or(24));
        self.authenticated_at + lifetime <= Utc::now()
    }
}

/// User data structure for the `authrelay_user` cookie.
/// Contains only display information, never the backend token.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RelayUserData {
    pub subject_id: String,
    pub display_name: String,
    pub provider: String,
    pub uid: Uuid,
    pub session_id: Uuid,
    pub session_start: i64,
}

impl RelayUserData {
    /// Generate a `UUIDv5` based on provider and subject id
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded namespace UUID is invalid (should never happen)
    #[must_use]
    pub fn generate_uid(provider: &str, subject_id: &str) -> Uuid {
        let subject_string = format!("{provider}|{subject_id}");
        // Fixed namespace UUID for authrelay
        let namespace = Uuid::parse_str("4f2cbd53-9a7e-4d1b-8f63-2a90cf1c2ab7").unwrap();
        Uuid::new_v5(&namespace, subject_string.as_bytes())
    }

    /// Generate a deterministic `session_id` from the uid and the session
    /// start timestamp, folded from a SHA-256 digest.
    #[must_use]
    pub fn generate_session_id(uid: &Uuid, session_start: i64) -> Uuid {
        let mut hasher = Sha256::new();
        hasher.update(uid.as_bytes());
        hasher.update(session_start.to_le_bytes());
        let hash_result = hasher.finalize();

        // Fold all 32 digest bytes into 16 instead of discarding half
        let mut uuid_bytes = [0u8; 16];
        for i in 0..16 {
            uuid_bytes[i] = hash_result[i] ^ hash_result[i + 16];
        }

        // Set version to 4 and variant bits to make it a valid UUID
        uuid_bytes[6] = (uuid_bytes[6] & 0x0f) | 0x40; // Version 4
        uuid_bytes[8] = (uuid_bytes[8] & 0x3f) | 0x80; // Variant 10

        Uuid::from_bytes(uuid_bytes)
    }

    /// Create a new `RelayUserData` with auto-generated uid and `session_id`
    #[must_use]
    pub fn new(session: &RelaySession) -> Self {
        let uid = Self::generate_uid(&session.provider, &session.subject_id);
        let session_start = session.authenticated_at.timestamp();
        let session_id = Self::generate_session_id(&uid, session_start);

        Self {
            subject_id: session.subject_id.clone(),
            display_name: session.display_name.clone(),
            provider: session.provider.clone(),
            uid,
            session_id,
            session_start,
        }
    }
}

/// Pending OTP challenge, carried between the request and verify steps in
/// an encrypted cookie. The passcode itself never reaches this process;
/// only the ordering proof and the target email are tracked.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OtpChallengeData {
    pub email: String,
    pub issued_at: DateTime<Utc>,
}

impl OtpChallengeData {
    #[must_use]
    pub fn new(email: String) -> Self {
        Self {
            email,
            issued_at: Utc::now(),
        }
    }

    /// Check whether the challenge has outlived the configured window.
    /// The upstream IdP enforces its own passcode expiry independently.
    #[must_use]
    pub fn is_expired(&self, otp_challenge_minutes: u64) -> bool {
        let lifetime = Duration::minutes(i64::try_from(otp_challenge_minutes).unwrap_or(10));
        self.issued_at + lifetime <= Utc::now()
    }
}
