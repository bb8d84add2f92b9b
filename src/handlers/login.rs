// Password sign-in handler
use actix_web::{web, HttpResponse};
use log::debug;

use crate::gateway::LoginAttempt;
use crate::handlers::helpers::session_response;
use crate::handlers::types::PasswordLoginRequest;
use crate::idp::IdentityProvider;
use crate::session::SessionManager;
use crate::utils::responses::ResponseBuilder;

/// Exchange a username/password pair for a session.
///
/// Any pending OTP challenge is discarded: switching to the password
/// path starts the attempt over.
pub async fn password_login(
    body: web::Json<PasswordLoginRequest>,
    idp: web::Data<dyn IdentityProvider>,
    session_manager: web::Data<SessionManager>,
) -> HttpResponse {
    let mut attempt = LoginAttempt::new(idp.into_inner());

    match attempt.verify_password(&body.username, &body.password).await {
        Ok(identity) => session_response(&session_manager, &identity, "password"),
        Err(e) => {
            debug!("password sign-in failed: {e}");
            let mut response = ResponseBuilder::auth_error(&e);
            // The attempt switched credential kind; drop any stale challenge
            if let Err(cookie_err) =
                response.add_cookie(&session_manager.create_expired_otp_cookie())
            {
                debug!("failed to attach cookie to error response: {cookie_err}");
            }
            response
        }
    }
}
