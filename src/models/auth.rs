//! Authentication error taxonomy
//!
//! Unified error type shared by the credential verifier, the OTP
//! challenge manager and the OAuth exchanger. Local validation and
//! explicit rejections are kept distinguishable from upstream transport
//! failures so a caller can choose between an "invalid credentials"
//! message and offering a retry.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::utils::responses::ResponseBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A required field was missing or malformed. Detected locally,
    /// before any upstream call is made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// OTP verification was attempted without a preceding request in the
    /// same login attempt.
    #[error("no pending one-time passcode challenge")]
    SequenceViolation,

    /// OTP verification named a different email than the one the pending
    /// challenge was issued for.
    #[error("email does not match the pending challenge")]
    EmailMismatch,

    /// The identity provider explicitly declined the credential.
    #[error("identity provider rejected the credential")]
    Rejected,

    /// The identity provider could not be reached or did not answer in
    /// time. The outcome of the attempt is unknown.
    #[error("identity provider unreachable: {0}")]
    Upstream(String),
}

impl AuthError {
    /// Stable machine-readable code for JSON error bodies
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidInput(_) => "invalid_input",
            AuthError::SequenceViolation => "sequence_violation",
            AuthError::EmailMismatch => "email_mismatch",
            AuthError::Rejected => "rejected",
            AuthError::Upstream(_) => "upstream",
        }
    }

    /// Only upstream failures are worth retrying as-is; every other
    /// variant needs different input from the user.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Upstream(_))
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::SequenceViolation | AuthError::EmailMismatch => StatusCode::CONFLICT,
            AuthError::Rejected => StatusCode::UNAUTHORIZED,
            AuthError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        ResponseBuilder::auth_error(self)
    }
}
