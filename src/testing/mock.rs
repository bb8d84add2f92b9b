//! Mock objects and fake implementations for testing
//!
//! `MockIdp` stands in for the upstream identity provider behind the
//! `IdentityProvider` trait. Outcomes are scripted per call and every
//! exchanged credential is recorded, so tests can assert both the
//! result and that no upstream call happened at all.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::idp::IdentityProvider;
use crate::models::auth::AuthError;
use crate::models::Credential;

/// Scripted outcome for one mock exchange
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Success response carrying `{token}`
    Token(String),
    /// Success response without a token (OTP send acknowledgement, or a
    /// token endpoint answering with an empty body)
    Accepted,
    /// Explicit non-2xx from the IdP
    Rejected,
    /// Transport failure or timeout
    Unreachable(String),
}

/// Mock identity provider with scripted outcomes and call recording
pub struct MockIdp {
    script: Mutex<VecDeque<MockOutcome>>,
    fallback: MockOutcome,
    calls: Mutex<Vec<Credential>>,
}

impl MockIdp {
    /// Provider that answers every exchange with the same outcome
    #[must_use]
    pub fn always(outcome: MockOutcome) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider that issues the given token for every exchange
    #[must_use]
    pub fn issuing_token(token: &str) -> Self {
        Self::always(MockOutcome::Token(token.to_string()))
    }

    /// Provider that declines every credential
    #[must_use]
    pub fn rejecting() -> Self {
        Self::always(MockOutcome::Rejected)
    }

    /// Provider that cannot be reached (simulated timeout)
    #[must_use]
    pub fn unreachable() -> Self {
        Self::always(MockOutcome::Unreachable("connection timed out".to_string()))
    }

    /// Queue an outcome consumed before the fallback applies
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn push_outcome(&self, outcome: MockOutcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    /// Credentials exchanged so far, in order
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<Credential> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of upstream exchanges performed
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_outcome(&self) -> MockOutcome {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl IdentityProvider for MockIdp {
    async fn exchange(&self, credential: &Credential) -> Result<Option<String>, AuthError> {
        self.calls.lock().unwrap().push(credential.clone());

        match self.next_outcome() {
            MockOutcome::Token(token) => Ok(Some(token)),
            MockOutcome::Accepted => Ok(None),
            MockOutcome::Rejected => {
                // Mirror the HTTP adapter's classification: a failed OTP
                // send is an upstream fault, not a credential rejection
                if matches!(credential, Credential::OtpRequest { .. }) {
                    Err(AuthError::Upstream(
                        "send-otp failed with status 500".to_string(),
                    ))
                } else {
                    Err(AuthError::Rejected)
                }
            }
            MockOutcome::Unreachable(reason) => Err(AuthError::Upstream(reason)),
        }
    }
}
