// Session introspection, sign-out and health handlers
use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use serde_json::json;

use crate::models::HealthResponse;
use crate::session::SessionManager;
use crate::utils::responses::ResponseBuilder;

/// Return the signed-in user's identity from the session cookie.
///
/// The body round-trips the subject id and the opaque backend token
/// exactly as they were issued, so the front-end can forward the token
/// on subsequent authorized requests.
pub async fn userinfo(req: HttpRequest, session_manager: web::Data<SessionManager>) -> HttpResponse {
    match session_manager.extract_session(&req) {
        Ok(session) => HttpResponse::Ok().json(json!({
            "id": session.subject_id,
            "token": session.backend_token,
            "name": session.display_name,
            "provider": session.provider,
            "authenticated_at": session.authenticated_at,
        })),
        Err(_) => ResponseBuilder::unauthorized(),
    }
}

/// Clear the session, user data and any pending OTP challenge
pub async fn sign_out(session_manager: web::Data<SessionManager>) -> HttpResponse {
    info!("user signed out; session and challenge cookies cleared");
    HttpResponse::Ok()
        .cookie(session_manager.create_expired_session_cookie())
        .cookie(session_manager.create_expired_user_cookie())
        .cookie(session_manager.create_expired_otp_cookie())
        .json(json!({ "status": "signed_out" }))
}

/// Health check endpoint
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        message: "Service is running".to_string(),
    })
}
