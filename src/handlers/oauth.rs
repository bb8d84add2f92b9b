// OAuth assertion sign-in handler
//
// The redirect/consent dance with the third-party provider happens
// entirely in the front-end; by the time this handler runs the browser
// holds an identity assertion plus whatever token material the provider
// released. The gateway forwards it upstream and either mints a session
// or reports the sign-in as denied — an upstream rejection never
// degrades into a local-only session.
use actix_web::{web, HttpResponse};
use log::debug;

use crate::gateway::LoginAttempt;
use crate::handlers::helpers::session_response;
use crate::handlers::types::OAuthLoginRequest;
use crate::idp::IdentityProvider;
use crate::models::OAuthAssertion;
use crate::session::SessionManager;
use crate::utils::responses::ResponseBuilder;

pub async fn oauth_login(
    body: web::Json<OAuthLoginRequest>,
    idp: web::Data<dyn IdentityProvider>,
    session_manager: web::Data<SessionManager>,
) -> HttpResponse {
    let request = body.into_inner();
    let provider = request.provider.clone();
    let assertion = OAuthAssertion {
        provider: request.provider,
        subject_email: request.email,
        display_name: request.name,
        access_token: request.access_token,
        refresh_token: request.refresh_token,
        expires_at: request.expires_at,
    };

    let mut attempt = LoginAttempt::new(idp.into_inner());

    match attempt.exchange_oauth(assertion).await {
        Ok(identity) => session_response(&session_manager, &identity, &provider),
        Err(e) => {
            debug!("oauth sign-in via {provider} failed: {e}");
            let mut response = ResponseBuilder::auth_error(&e);
            // Switching credential kind abandons any pending challenge
            if let Err(cookie_err) =
                response.add_cookie(&session_manager.create_expired_otp_cookie())
            {
                debug!("failed to attach cookie to error response: {cookie_err}");
            }
            response
        }
    }
}
