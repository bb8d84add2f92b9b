// Integration tests for the authentication gateway: attempt flows over a
// scripted mock identity provider, and full HTTP round-trips through the
// actix handlers including cookie choreography.
use actix_web::{test, web, App};
use serde_json::json;
use std::sync::Arc;

use authrelay::gateway::LoginAttempt;
use authrelay::handlers::{oauth_login, otp_request, otp_verify, password_login, sign_out, userinfo};
use authrelay::idp::IdentityProvider;
use authrelay::models::auth::AuthError;
use authrelay::models::{Credential, OAuthAssertion};
use authrelay::testing::constants::{
    TEST_EMAIL, TEST_OTP_CODE, TEST_PASSWORD, TEST_TOKEN, TEST_USERNAME,
};
use authrelay::testing::fixtures::TestFixtures;
use authrelay::testing::mock::{MockIdp, MockOutcome};

fn oauth_assertion() -> OAuthAssertion {
    OAuthAssertion {
        provider: "google".to_string(),
        subject_email: TEST_EMAIL.to_string(),
        display_name: Some("Alice Example".to_string()),
        access_token: Some("ya29.access".to_string()),
        refresh_token: None,
        expires_at: Some(1_754_000_000),
    }
}

// ---------------------------------------------------------------------------
// Attempt-level flows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_empty_fields_never_reach_the_idp() {
    let idp = Arc::new(MockIdp::issuing_token(TEST_TOKEN));
    let mut attempt = LoginAttempt::new(idp.clone());

    let result = attempt.verify_password("", TEST_PASSWORD).await;
    assert!(matches!(result, Err(AuthError::InvalidInput(_))));

    let result = attempt.verify_password(TEST_USERNAME, "").await;
    assert!(matches!(result, Err(AuthError::InvalidInput(_))));

    let result = attempt.request_otp("").await;
    assert!(matches!(result, Err(AuthError::InvalidInput(_))));

    let result = attempt.verify_otp("", TEST_OTP_CODE).await;
    assert!(matches!(result, Err(AuthError::InvalidInput(_))));

    let result = attempt.verify_otp(TEST_EMAIL, "").await;
    assert!(matches!(result, Err(AuthError::InvalidInput(_))));

    assert_eq!(idp.call_count(), 0);
}

#[tokio::test]
async fn test_password_login_yields_verified_identity() {
    let idp = Arc::new(MockIdp::issuing_token("abc"));
    let mut attempt = LoginAttempt::new(idp.clone());

    let identity = attempt
        .verify_password(TEST_USERNAME, TEST_PASSWORD)
        .await
        .expect("password verification should succeed");

    assert_eq!(identity.subject_id, TEST_USERNAME);
    assert_eq!(identity.display_name, TEST_USERNAME);
    assert_eq!(identity.token, "abc");

    // Exactly one upstream call, carrying the credential pair
    assert_eq!(
        idp.calls(),
        vec![Credential::Password {
            username: TEST_USERNAME.to_string(),
            password: TEST_PASSWORD.to_string(),
        }]
    );
}

#[tokio::test]
async fn test_password_rejection() {
    let idp = Arc::new(MockIdp::rejecting());
    let mut attempt = LoginAttempt::new(idp);

    let result = attempt.verify_password(TEST_USERNAME, "wrong").await;
    assert_eq!(result, Err(AuthError::Rejected));
}

#[tokio::test]
async fn test_token_less_success_reads_as_rejection() {
    // A 2xx /login response without a token must not become a session
    let idp = Arc::new(MockIdp::always(MockOutcome::Accepted));
    let mut attempt = LoginAttempt::new(idp);

    let result = attempt.verify_password(TEST_USERNAME, TEST_PASSWORD).await;
    assert_eq!(result, Err(AuthError::Rejected));
}

#[tokio::test]
async fn test_otp_verify_before_request_is_a_sequence_violation() {
    let idp = Arc::new(MockIdp::issuing_token(TEST_TOKEN));
    let mut attempt = LoginAttempt::new(idp.clone());

    let result = attempt.verify_otp(TEST_EMAIL, TEST_OTP_CODE).await;
    assert_eq!(result, Err(AuthError::SequenceViolation));
    assert_eq!(idp.call_count(), 0);
}

#[tokio::test]
async fn test_otp_email_mismatch() {
    let idp = Arc::new(MockIdp::always(MockOutcome::Accepted));
    let mut attempt = LoginAttempt::new(idp.clone());

    attempt
        .request_otp("alice@example.com")
        .await
        .expect("otp request should succeed");

    let result = attempt.verify_otp("bob@example.com", TEST_OTP_CODE).await;
    assert_eq!(result, Err(AuthError::EmailMismatch));

    // Only the send call went upstream; the mismatched verify did not
    assert_eq!(idp.call_count(), 1);
}

#[tokio::test]
async fn test_otp_happy_path() {
    let idp = Arc::new(MockIdp::issuing_token(TEST_TOKEN));
    let mut attempt = LoginAttempt::new(idp.clone());

    attempt.request_otp(TEST_EMAIL).await.unwrap();
    let identity = attempt.verify_otp(TEST_EMAIL, TEST_OTP_CODE).await.unwrap();

    assert_eq!(identity.subject_id, TEST_EMAIL);
    assert_eq!(identity.token, TEST_TOKEN);
    assert!(attempt.otp_state().is_terminal());
    assert_eq!(idp.call_count(), 2);
}

#[tokio::test]
async fn test_otp_rejection_consumes_the_challenge() {
    let idp = Arc::new(MockIdp::rejecting());
    idp.push_outcome(MockOutcome::Accepted); // the send itself succeeds
    let mut attempt = LoginAttempt::new(idp.clone());

    attempt.request_otp(TEST_EMAIL).await.unwrap();

    let result = attempt.verify_otp(TEST_EMAIL, "000000").await;
    assert_eq!(result, Err(AuthError::Rejected));
    assert!(attempt.otp_state().is_terminal());

    // The same email and code fail again without being silently retried
    let result = attempt.verify_otp(TEST_EMAIL, "000000").await;
    assert_eq!(result, Err(AuthError::SequenceViolation));

    // One send, one verify; the repeat never went upstream
    assert_eq!(idp.call_count(), 2);
}

#[tokio::test]
async fn test_otp_upstream_failure_leaves_challenge_pending() {
    let idp = Arc::new(MockIdp::unreachable());
    idp.push_outcome(MockOutcome::Accepted);
    let mut attempt = LoginAttempt::new(idp.clone());

    attempt.request_otp(TEST_EMAIL).await.unwrap();

    // The outcome is unknown, so the challenge survives for a retry
    let result = attempt.verify_otp(TEST_EMAIL, TEST_OTP_CODE).await;
    assert!(matches!(result, Err(AuthError::Upstream(_))));
    assert!(!attempt.otp_state().is_terminal());
    assert_eq!(attempt.otp_state().pending_email(), Some(TEST_EMAIL));
}

#[tokio::test]
async fn test_failed_otp_send_is_upstream() {
    let idp = Arc::new(MockIdp::rejecting());
    let mut attempt = LoginAttempt::new(idp);

    let result = attempt.request_otp(TEST_EMAIL).await;
    assert!(matches!(result, Err(AuthError::Upstream(_))));
}

#[tokio::test]
async fn test_attempts_do_not_share_challenge_state() {
    let idp = Arc::new(MockIdp::always(MockOutcome::Accepted));

    let mut first = LoginAttempt::new(idp.clone());
    first.request_otp(TEST_EMAIL).await.unwrap();

    // A different attempt against the same email starts from Idle
    let mut second = LoginAttempt::new(idp.clone());
    let result = second.verify_otp(TEST_EMAIL, TEST_OTP_CODE).await;
    assert_eq!(result, Err(AuthError::SequenceViolation));
}

#[tokio::test]
async fn test_switching_to_password_discards_pending_challenge() {
    let idp = Arc::new(MockIdp::issuing_token(TEST_TOKEN));
    let mut attempt = LoginAttempt::new(idp);

    attempt.request_otp(TEST_EMAIL).await.unwrap();
    attempt
        .verify_password(TEST_USERNAME, TEST_PASSWORD)
        .await
        .unwrap();

    let result = attempt.verify_otp(TEST_EMAIL, TEST_OTP_CODE).await;
    assert_eq!(result, Err(AuthError::SequenceViolation));
}

#[tokio::test]
async fn test_oauth_exchange_success() {
    let idp = Arc::new(MockIdp::issuing_token(TEST_TOKEN));
    let mut attempt = LoginAttempt::new(idp.clone());

    let identity = attempt.exchange_oauth(oauth_assertion()).await.unwrap();
    assert_eq!(identity.subject_id, TEST_EMAIL);
    assert_eq!(identity.display_name, "Alice Example");
    assert_eq!(identity.token, TEST_TOKEN);
    assert_eq!(idp.call_count(), 1);
}

#[tokio::test]
async fn test_oauth_rejection_means_denied() {
    let idp = Arc::new(MockIdp::rejecting());
    let mut attempt = LoginAttempt::new(idp);

    let result = attempt.exchange_oauth(oauth_assertion()).await;
    assert_eq!(result, Err(AuthError::Rejected));
}

#[tokio::test]
async fn test_oauth_timeout_is_upstream_not_rejected() {
    let idp = Arc::new(MockIdp::unreachable());
    let mut attempt = LoginAttempt::new(idp);

    let result = attempt.exchange_oauth(oauth_assertion()).await;
    let err = result.unwrap_err();
    assert!(matches!(err, AuthError::Upstream(_)));
    assert_ne!(err, AuthError::Rejected);
    assert!(err.is_retryable());
}

// ---------------------------------------------------------------------------
// HTTP round-trips through the handlers
// ---------------------------------------------------------------------------

macro_rules! gateway_app {
    ($idp:expr) => {{
        let idp: Arc<dyn IdentityProvider> = $idp;
        test::init_service(
            App::new()
                .app_data(web::Data::from(idp))
                .app_data(web::Data::new(TestFixtures::session_manager()))
                .route("/auth/login", web::post().to(password_login))
                .route("/auth/otp/request", web::post().to(otp_request))
                .route("/auth/otp/verify", web::post().to(otp_verify))
                .route("/auth/oauth/login", web::post().to(oauth_login))
                .route("/auth/userinfo", web::get().to(userinfo))
                .route("/auth/sign_out", web::post().to(sign_out)),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_password_login_sets_session_cookies() {
    let app = gateway_app!(Arc::new(MockIdp::issuing_token(TEST_TOKEN)));

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let cookies: Vec<_> = resp.response().cookies().collect();
    assert!(cookies.iter().any(|c| c.name() == "authrelay_session"));
    assert!(cookies.iter().any(|c| c.name() == "authrelay_user"));

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], TEST_USERNAME);
    assert_eq!(body["provider"], "password");
    // The backend token never appears in a response body on sign-in
    assert!(body.get("token").is_none());
}

#[actix_web::test]
async fn test_password_rejection_is_unauthorized() {
    let app = gateway_app!(Arc::new(MockIdp::rejecting()));

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": TEST_USERNAME, "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "rejected");
}

#[actix_web::test]
async fn test_missing_fields_map_to_invalid_input() {
    let app = gateway_app!(Arc::new(MockIdp::issuing_token(TEST_TOKEN)));

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": TEST_USERNAME }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_input");
}

#[actix_web::test]
async fn test_full_otp_flow_over_http() {
    let app = gateway_app!(Arc::new(MockIdp::issuing_token(TEST_TOKEN)));

    // Step 1: request a passcode; the challenge comes back as a cookie
    let req = test::TestRequest::post()
        .uri("/auth/otp/request")
        .set_json(json!({ "email": TEST_EMAIL }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let otp_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "authrelay_otp")
        .expect("challenge cookie should be set")
        .into_owned();
    assert!(!otp_cookie.value().is_empty());

    // Step 2: verify with the challenge cookie attached
    let req = test::TestRequest::post()
        .uri("/auth/otp/verify")
        .cookie(otp_cookie)
        .set_json(json!({ "email": TEST_EMAIL, "otp": TEST_OTP_CODE }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let session_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "authrelay_session")
        .expect("session cookie should be set")
        .into_owned();

    // The challenge cookie is consumed on success
    let cleared_otp = resp
        .response()
        .cookies()
        .find(|c| c.name() == "authrelay_otp")
        .expect("challenge cookie should be cleared");
    assert!(cleared_otp.value().is_empty());

    // Step 3: the session round-trips subject id and backend token
    let req = test::TestRequest::get()
        .uri("/auth/userinfo")
        .cookie(session_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], TEST_EMAIL);
    assert_eq!(body["token"], TEST_TOKEN);
    assert_eq!(body["provider"], "otp");
}

#[actix_web::test]
async fn test_otp_verify_without_challenge_cookie_conflicts() {
    let app = gateway_app!(Arc::new(MockIdp::issuing_token(TEST_TOKEN)));

    let req = test::TestRequest::post()
        .uri("/auth/otp/verify")
        .set_json(json!({ "email": TEST_EMAIL, "otp": TEST_OTP_CODE }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "sequence_violation");
}

#[actix_web::test]
async fn test_oauth_upstream_failure_is_bad_gateway() {
    let app = gateway_app!(Arc::new(MockIdp::unreachable()));

    let req = test::TestRequest::post()
        .uri("/auth/oauth/login")
        .set_json(json!({
            "provider": "google",
            "email": TEST_EMAIL,
            "name": "Alice Example",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "upstream");
}

#[actix_web::test]
async fn test_oauth_login_over_http() {
    let app = gateway_app!(Arc::new(MockIdp::issuing_token(TEST_TOKEN)));

    let req = test::TestRequest::post()
        .uri("/auth/oauth/login")
        .set_json(json!({
            "provider": "google",
            "email": TEST_EMAIL,
            "name": "Alice Example",
            "access_token": "ya29.access",
            "expires_at": 1_754_000_000_i64,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], TEST_EMAIL);
    assert_eq!(body["name"], "Alice Example");
    assert_eq!(body["provider"], "google");
}

#[actix_web::test]
async fn test_userinfo_without_session_is_unauthorized() {
    let app = gateway_app!(Arc::new(MockIdp::issuing_token(TEST_TOKEN)));

    let req = test::TestRequest::get().uri("/auth/userinfo").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_sign_out_clears_all_cookies() {
    let app = gateway_app!(Arc::new(MockIdp::issuing_token(TEST_TOKEN)));

    let req = test::TestRequest::post().uri("/auth/sign_out").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let cookies: Vec<_> = resp.response().cookies().collect();
    for name in ["authrelay_session", "authrelay_user", "authrelay_otp"] {
        let cookie = cookies
            .iter()
            .find(|c| c.name() == name)
            .unwrap_or_else(|| panic!("{name} should be cleared"));
        assert!(cookie.value().is_empty());
    }
}
