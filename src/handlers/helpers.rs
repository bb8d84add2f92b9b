// Helper functions shared across login handlers
use actix_web::HttpResponse;
use chrono::Utc;
use log::error;
use serde_json::json;

use crate::gateway::issuer;
use crate::models::{RelayUserData, VerifiedIdentity};
use crate::session::SessionManager;
use crate::utils::responses::ResponseBuilder;

/// Issue a session for a verified identity and build the sign-in
/// response: session and user cookies set, pending OTP challenge
/// cleared, display data in the body. The backend token travels only in
/// the encrypted session cookie.
pub fn session_response(
    session_manager: &SessionManager,
    identity: &VerifiedIdentity,
    provider: &str,
) -> HttpResponse {
    let session = issuer::issue(identity, provider, Utc::now());
    let user_data = RelayUserData::new(&session);

    let session_cookie = match session_manager.create_session_cookie(&session) {
        Ok(cookie) => cookie,
        Err(e) => {
            error!("failed to encrypt session cookie: {e}");
            return ResponseBuilder::server_error();
        }
    };
    let user_cookie = match session_manager.create_user_cookie(&user_data) {
        Ok(cookie) => cookie,
        Err(e) => {
            error!("failed to encrypt user cookie: {e}");
            return ResponseBuilder::server_error();
        }
    };

    HttpResponse::Ok()
        .cookie(session_cookie)
        .cookie(user_cookie)
        .cookie(session_manager.create_expired_otp_cookie())
        .json(json!({
            "id": user_data.subject_id,
            "name": user_data.display_name,
            "provider": user_data.provider,
            "session_id": user_data.session_id,
        }))
}
