//! Session issuance
//!
//! Pure construction of a session from a verified identity. Any failure
//! has already been caught by the verifier that produced the identity;
//! this step cannot fail and never fabricates a token.

use chrono::{DateTime, Utc};

use crate::models::{RelaySession, VerifiedIdentity};

/// Build the session record the caller will own.
///
/// Idempotent: equal inputs produce structurally equal sessions. The
/// `authenticated_at` stamp is supplied by the caller so issuance stays
/// deterministic.
#[must_use]
pub fn issue(
    identity: &VerifiedIdentity,
    provider: &str,
    authenticated_at: DateTime<Utc>,
) -> RelaySession {
    RelaySession {
        subject_id: identity.subject_id.clone(),
        backend_token: identity.token.clone(),
        display_name: identity.display_name.clone(),
        provider: provider.to_string(),
        authenticated_at,
    }
}
