//! Authentication gateway core
//!
//! `LoginAttempt` drives one login attempt through exactly one of the
//! three verification paths — password, OTP, or OAuth assertion — and
//! yields a `VerifiedIdentity` on success. All credential checking is
//! delegated to the upstream IdP through the `IdentityProvider` trait;
//! this module owns input validation, step ordering and error
//! classification.
//!
//! Attempts are isolated: each `LoginAttempt` is built fresh per
//! request, optionally resuming a pending OTP challenge that the caller
//! carried in its cookie. Nothing is shared between attempts.

pub mod issuer;
pub mod otp;

use std::sync::Arc;

use log::{debug, info};

use crate::idp::IdentityProvider;
use crate::models::auth::AuthError;
use crate::models::{Credential, OAuthAssertion, OtpChallengeData, VerifiedIdentity};
use crate::validation::{require_email, require_field};

use otp::OtpState;

pub struct LoginAttempt {
    idp: Arc<dyn IdentityProvider>,
    otp: OtpState,
}

impl LoginAttempt {
    /// Start a fresh attempt with no pending state
    #[must_use]
    pub fn new(idp: Arc<dyn IdentityProvider>) -> Self {
        Self {
            idp,
            otp: OtpState::Idle,
        }
    }

    /// Resume an attempt whose OTP challenge the caller carried between
    /// requests
    #[must_use]
    pub fn resume(idp: Arc<dyn IdentityProvider>, challenge: Option<OtpChallengeData>) -> Self {
        Self {
            idp,
            otp: OtpState::from_challenge(challenge),
        }
    }

    #[must_use]
    pub fn otp_state(&self) -> &OtpState {
        &self.otp
    }

    /// Exchange a username/password pair for a verified identity
    ///
    /// # Errors
    ///
    /// `InvalidInput` for empty fields (no upstream call is made),
    /// `Rejected` if the IdP declined the pair, `Upstream` on transport
    /// failure.
    pub async fn verify_password(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<VerifiedIdentity, AuthError> {
        require_field("username", username)?;
        require_field("password", password)?;

        // Switching credential kind abandons any pending OTP challenge
        self.otp.reset();

        let credential = Credential::Password {
            username: username.to_string(),
            password: password.to_string(),
        };
        let token = self.exchange_for_token(&credential).await?;

        info!("password verification succeeded for {username}");
        Ok(VerifiedIdentity {
            subject_id: username.to_string(),
            display_name: username.to_string(),
            token,
        })
    }

    /// Ask the IdP to send a one-time passcode to `email`
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a missing or malformed email (no upstream
    /// call), `Upstream` if the IdP could not be reached or declined to
    /// send. The passcode itself is owned entirely by the IdP.
    pub async fn request_otp(&mut self, email: &str) -> Result<(), AuthError> {
        require_email(email)?;

        let credential = Credential::OtpRequest {
            email: email.to_string(),
        };
        self.idp.exchange(&credential).await?;

        self.otp.begin(email.to_string());
        debug!("otp challenge issued for {email}");
        Ok(())
    }

    /// Exchange a previously requested passcode for a verified identity
    ///
    /// # Errors
    ///
    /// `InvalidInput` for empty fields, `SequenceViolation` without a
    /// pending challenge, `EmailMismatch` if the email differs from the
    /// challenged one, `Rejected` if the IdP declined the code (the
    /// challenge is consumed), `Upstream` on transport failure (the
    /// challenge stays pending — the outcome is unknown).
    pub async fn verify_otp(
        &mut self,
        email: &str,
        code: &str,
    ) -> Result<VerifiedIdentity, AuthError> {
        require_email(email)?;
        require_field("code", code)?;
        self.otp.check_verify(email)?;

        let credential = Credential::OtpVerify {
            email: email.to_string(),
            code: code.to_string(),
        };
        match self.exchange_for_token(&credential).await {
            Ok(token) => {
                self.otp.complete();
                info!("otp verification succeeded for {email}");
                Ok(VerifiedIdentity {
                    subject_id: email.to_string(),
                    display_name: email.to_string(),
                    token,
                })
            }
            Err(AuthError::Rejected) => {
                self.otp.fail();
                Err(AuthError::Rejected)
            }
            Err(other) => Err(other),
        }
    }

    /// Exchange a third-party OAuth assertion for a verified identity
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a missing subject email, `Rejected` if the IdP
    /// declined the assertion (the sign-in must be treated as denied),
    /// `Upstream` on transport failure.
    pub async fn exchange_oauth(
        &mut self,
        assertion: OAuthAssertion,
    ) -> Result<VerifiedIdentity, AuthError> {
        require_email(&assertion.subject_email)?;
        require_field("provider", &assertion.provider)?;

        // Switching credential kind abandons any pending OTP challenge
        self.otp.reset();

        let subject_id = assertion.subject_email.clone();
        let display_name = assertion
            .display_name
            .clone()
            .unwrap_or_else(|| assertion.subject_email.clone());
        let provider = assertion.provider.clone();

        let token = self
            .exchange_for_token(&Credential::OAuthAssertion(assertion))
            .await?;

        info!("oauth assertion accepted for {subject_id} via {provider}");
        Ok(VerifiedIdentity {
            subject_id,
            display_name,
            token,
        })
    }

    /// One upstream exchange that must yield a non-empty token.
    /// A success response without a token is a rejection — the gateway
    /// never fabricates one.
    async fn exchange_for_token(&self, credential: &Credential) -> Result<String, AuthError> {
        match self.idp.exchange(credential).await? {
            Some(token) => Ok(token),
            None => {
                debug!("{} exchange returned no token", credential.kind());
                Err(AuthError::Rejected)
            }
        }
    }
}
