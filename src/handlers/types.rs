// Request bodies accepted from the browser
//
// Every field defaults to empty/absent so that a missing field reaches
// the gateway's own validation and is reported as `invalid_input`
// rather than as a generic deserialization failure.
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PasswordLoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OtpRequestBody {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct OtpVerifyBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct OAuthLoginRequest {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub email: String,
    pub name: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}
