//! Upstream identity provider boundary
//!
//! The gateway's single capability against the IdP is exchanging a
//! credential for an opaque token. `IdentityProvider` expresses that
//! capability as a trait so the HTTP adapter can be swapped for a mock
//! in tests; `IdpClient` is the reqwest implementation of the wire
//! contract.
//!
//! The IdP is the trust boundary: tokens it returns are stored and
//! replayed verbatim, never parsed or validated locally.

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::models::auth::AuthError;
use crate::models::Credential;
use crate::settings::IdpSettings;

/// Exchange a credential for an opaque backend token.
///
/// `Ok(Some(token))` for token-issuing operations, `Ok(None)` for
/// operations the IdP merely acknowledges (sending an OTP) or for a
/// success response that carried no token.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Perform exactly one upstream exchange for the given credential
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` if the IdP explicitly declined the
    /// credential, or `AuthError::Upstream` if the IdP could not be
    /// reached, timed out, or failed a non-credential operation.
    async fn exchange(&self, credential: &Credential) -> Result<Option<String>, AuthError>;
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SendOtpBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyOtpBody<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Serialize)]
struct OAuthLoginBody<'a> {
    email: &'a str,
    name: &'a str,
    provider: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<i64>,
}

#[derive(Deserialize)]
struct TokenReply {
    token: Option<String>,
}

/// HTTP adapter for the upstream identity provider
pub struct IdpClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl IdpClient {
    /// Build a client for the configured IdP endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP
    /// client cannot be constructed.
    pub fn new(settings: &IdpSettings) -> anyhow::Result<Self> {
        let base_url = Url::parse(&settings.base_url)?;
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, AuthError> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|e| AuthError::Upstream(format!("invalid {path} endpoint: {e}")))?;

        self.http_client
            .post(endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(path, &e))
    }

    /// Read the `{token}` reply from a token-issuing endpoint.
    /// A success body without a usable token is reported as `None`; the
    /// caller treats that the same as an explicit rejection.
    async fn read_token(path: &str, response: reqwest::Response) -> Result<Option<String>, AuthError> {
        let status = response.status();
        if !status.is_success() {
            debug!("{path} declined with status {status}");
            return Err(AuthError::Rejected);
        }

        let reply: TokenReply = match response.json().await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("{path} returned success with an unreadable body: {e}");
                return Ok(None);
            }
        };

        Ok(reply.token.filter(|token| !token.is_empty()))
    }
}

#[async_trait]
impl IdentityProvider for IdpClient {
    async fn exchange(&self, credential: &Credential) -> Result<Option<String>, AuthError> {
        match credential {
            Credential::Password { username, password } => {
                let response = self
                    .post_json(
                        "login",
                        &LoginBody {
                            username,
                            password,
                        },
                    )
                    .await?;
                Self::read_token("login", response).await
            }
            Credential::OtpRequest { email } => {
                let response = self.post_json("send-otp", &SendOtpBody { email }).await?;
                let status = response.status();
                if status.is_success() {
                    // Any 2xx acknowledges the send; the body is ignored
                    Ok(None)
                } else {
                    // The IdP owns code generation; a failure to send is an
                    // upstream fault, not a credential rejection
                    Err(AuthError::Upstream(format!(
                        "send-otp failed with status {status}"
                    )))
                }
            }
            Credential::OtpVerify { email, code } => {
                let response = self
                    .post_json("verify-otp", &VerifyOtpBody { email, otp: code })
                    .await?;
                Self::read_token("verify-otp", response).await
            }
            Credential::OAuthAssertion(assertion) => {
                let body = OAuthLoginBody {
                    email: &assertion.subject_email,
                    name: assertion
                        .display_name
                        .as_deref()
                        .unwrap_or(&assertion.subject_email),
                    provider: &assertion.provider,
                    access_token: assertion.access_token.as_deref(),
                    refresh_token: assertion.refresh_token.as_deref(),
                    expires_at: assertion.expires_at,
                };
                let response = self.post_json("oauth-login", &body).await?;
                Self::read_token("oauth-login", response).await
            }
        }
    }
}

fn transport_error(path: &str, err: &reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::Upstream(format!("{path} timed out"))
    } else {
        AuthError::Upstream(format!("{path}: {err}"))
    }
}
