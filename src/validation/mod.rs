//! Local input validation
//!
//! Pre-network checks for credential fields. A failure here is reported
//! as `InvalidInput` and never reaches the upstream identity provider.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::auth::AuthError;

/// Pragmatic shape check: one `@` with non-empty, whitespace-free sides.
/// The upstream IdP owns real address validation.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("email regex must compile"));

/// Require a non-empty field value
///
/// # Errors
///
/// Returns `AuthError::InvalidInput` naming the field if the value is
/// empty or whitespace-only.
pub fn require_field(name: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidInput(format!("{name} must not be empty")));
    }
    Ok(())
}

/// Require a plausibly-shaped email address
///
/// # Errors
///
/// Returns `AuthError::InvalidInput` if the value is empty or does not
/// look like an email address.
pub fn require_email(value: &str) -> Result<(), AuthError> {
    require_field("email", value)?;
    if !EMAIL_RE.is_match(value) {
        return Err(AuthError::InvalidInput(
            "email is not a valid address".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field_rejects_empty() {
        assert!(require_field("username", "alice").is_ok());
        assert_eq!(
            require_field("username", ""),
            Err(AuthError::InvalidInput(
                "username must not be empty".to_string()
            ))
        );
        assert!(require_field("password", "   ").is_err());
    }

    #[test]
    fn test_require_email_shapes() {
        assert!(require_email("alice@example.com").is_ok());
        assert!(require_email("a@b").is_ok());

        assert!(require_email("").is_err());
        assert!(require_email("no-at-sign").is_err());
        assert!(require_email("@missing-local").is_err());
        assert!(require_email("missing-domain@").is_err());
        assert!(require_email("spaces in@address").is_err());
    }
}
