//! Two-phase OTP challenge state machine
//!
//! One machine per login attempt: `Idle -> AwaitingVerification ->
//! Verified | Failed`. The passcode itself never enters this process;
//! the machine only proves that a request preceded the verify and that
//! both steps named the same email. Terminal states are never reused —
//! a fresh attempt starts a fresh machine.

use chrono::{DateTime, Utc};

use crate::models::auth::AuthError;
use crate::models::OtpChallengeData;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OtpState {
    /// No challenge requested yet
    #[default]
    Idle,
    /// A passcode was sent; the next verify must name this email
    AwaitingVerification {
        email: String,
        issued_at: DateTime<Utc>,
    },
    /// The IdP accepted the passcode
    Verified,
    /// The IdP declined the passcode; the challenge is consumed
    Failed,
}

impl OtpState {
    /// Rebuild the machine from a challenge carried in a cookie.
    /// No cookie (or an expired one) means no request happened in this
    /// attempt.
    #[must_use]
    pub fn from_challenge(challenge: Option<OtpChallengeData>) -> Self {
        match challenge {
            Some(data) => OtpState::AwaitingVerification {
                email: data.email,
                issued_at: data.issued_at,
            },
            None => OtpState::Idle,
        }
    }

    /// The email a pending challenge was issued for
    #[must_use]
    pub fn pending_email(&self) -> Option<&str> {
        match self {
            OtpState::AwaitingVerification { email, .. } => Some(email),
            _ => None,
        }
    }

    /// Snapshot of the pending challenge for cookie serialization
    #[must_use]
    pub fn challenge_data(&self) -> Option<OtpChallengeData> {
        match self {
            OtpState::AwaitingVerification { email, issued_at } => Some(OtpChallengeData {
                email: email.clone(),
                issued_at: *issued_at,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, OtpState::Verified | OtpState::Failed)
    }

    /// Record a successfully sent passcode. Always valid: requesting a
    /// new code abandons whatever state the attempt was in.
    pub fn begin(&mut self, email: String) {
        *self = OtpState::AwaitingVerification {
            email,
            issued_at: Utc::now(),
        };
    }

    /// Check that a verify call is admissible in the current state
    ///
    /// # Errors
    ///
    /// Returns `SequenceViolation` unless a challenge is pending, and
    /// `EmailMismatch` if the pending challenge was issued for a
    /// different email.
    pub fn check_verify(&self, email: &str) -> Result<(), AuthError> {
        match self {
            OtpState::AwaitingVerification { email: pending, .. } => {
                if pending == email {
                    Ok(())
                } else {
                    Err(AuthError::EmailMismatch)
                }
            }
            // Idle: verify-before-request. Terminal: the challenge was
            // already consumed and is not retried silently.
            OtpState::Idle | OtpState::Verified | OtpState::Failed => {
                Err(AuthError::SequenceViolation)
            }
        }
    }

    /// Transition to `Verified`
    pub fn complete(&mut self) {
        *self = OtpState::Verified;
    }

    /// Transition to `Failed`, consuming the challenge
    pub fn fail(&mut self) {
        *self = OtpState::Failed;
    }

    /// Discard any pending challenge, e.g. when the caller switches to a
    /// different credential kind mid-attempt
    pub fn reset(&mut self) {
        *self = OtpState::Idle;
    }
}
