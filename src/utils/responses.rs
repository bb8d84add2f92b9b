//! HTTP response handling
//!
//! Consistent JSON error bodies across all handlers. Every error carries
//! a stable `error` code and a human-readable `error_description`, so a
//! UI can distinguish "bad credentials" from "upstream unavailable"
//! without string-matching descriptions.

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError};

use crate::models::auth::AuthError;

/// Unified response builder for error responses
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Build a JSON error response with a stable error code
    #[must_use]
    pub fn json_error(status: StatusCode, error: &str, description: &str) -> HttpResponse {
        HttpResponseBuilder::new(status)
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .json(serde_json::json!({
                "error": error,
                "error_description": description,
            }))
    }

    /// Map an authentication error onto its HTTP representation
    #[must_use]
    pub fn auth_error(err: &AuthError) -> HttpResponse {
        let description = err.to_string();
        Self::json_error(err.status_code(), err.code(), &description)
    }

    /// Response for requests without a valid session
    #[must_use]
    pub fn unauthorized() -> HttpResponse {
        Self::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Authentication is required to access this resource",
        )
    }

    /// Response for malformed request bodies
    #[must_use]
    pub fn invalid_request(description: &str) -> HttpResponse {
        Self::json_error(StatusCode::BAD_REQUEST, "invalid_request", description)
    }

    /// Response for internal failures (cookie encryption and the like)
    #[must_use]
    pub fn server_error() -> HttpResponse {
        Self::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "server_error",
            "An internal server error occurred",
        )
    }
}
