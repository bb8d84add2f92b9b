// OTP request and verify handlers
//
// The two-phase challenge state rides in an encrypted cookie between the
// calls: each browser carries its own pending challenge, so independent
// attempts can never satisfy each other's ordering requirement.
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error};
use serde_json::json;

use crate::gateway::LoginAttempt;
use crate::handlers::helpers::session_response;
use crate::handlers::types::{OtpRequestBody, OtpVerifyBody};
use crate::idp::IdentityProvider;
use crate::models::auth::AuthError;
use crate::session::SessionManager;
use crate::utils::responses::ResponseBuilder;

/// Ask the upstream IdP to send a passcode and record the challenge.
///
/// A repeated request replaces any earlier challenge for this browser.
pub async fn otp_request(
    body: web::Json<OtpRequestBody>,
    idp: web::Data<dyn IdentityProvider>,
    session_manager: web::Data<SessionManager>,
) -> HttpResponse {
    let mut attempt = LoginAttempt::new(idp.into_inner());

    match attempt.request_otp(&body.email).await {
        Ok(()) => {
            let Some(challenge) = attempt.otp_state().challenge_data() else {
                error!("otp request succeeded but no challenge was recorded");
                return ResponseBuilder::server_error();
            };
            match session_manager.create_otp_cookie(&challenge) {
                Ok(cookie) => HttpResponse::Ok()
                    .cookie(cookie)
                    .json(json!({ "status": "sent", "email": challenge.email })),
                Err(e) => {
                    error!("failed to encrypt otp challenge cookie: {e}");
                    ResponseBuilder::server_error()
                }
            }
        }
        Err(e) => {
            debug!("otp request failed: {e}");
            ResponseBuilder::auth_error(&e)
        }
    }
}

/// Verify a passcode against the pending challenge and mint a session.
pub async fn otp_verify(
    req: HttpRequest,
    body: web::Json<OtpVerifyBody>,
    idp: web::Data<dyn IdentityProvider>,
    session_manager: web::Data<SessionManager>,
) -> HttpResponse {
    let challenge = session_manager.get_otp_challenge_from_request(&req);
    let mut attempt = LoginAttempt::resume(idp.into_inner(), challenge);

    match attempt.verify_otp(&body.email, &body.otp).await {
        Ok(identity) => session_response(&session_manager, &identity, "otp"),
        Err(e) => {
            debug!("otp verification failed: {e}");
            let mut response = ResponseBuilder::auth_error(&e);
            // A rejection consumes the challenge; a retry must start
            // over with a fresh request. Upstream failures leave the
            // challenge pending since the outcome is unknown.
            if matches!(e, AuthError::Rejected) {
                if let Err(cookie_err) =
                    response.add_cookie(&session_manager.create_expired_otp_cookie())
                {
                    debug!("failed to attach cookie to error response: {cookie_err}");
                }
            }
            response
        }
    }
}
