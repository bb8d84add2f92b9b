#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use authrelay::{
    handlers::{
        health, oauth_login, otp_request, otp_verify, password_login, sign_out, userinfo,
    },
    idp::{IdentityProvider, IdpClient},
    session::SessionManager,
    settings::RelaySettings,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = RelaySettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    // One shared client for all upstream IdP calls, bounded by the
    // configured timeout
    let idp_client = IdpClient::new(&settings.idp)
        .map_err(|e| std::io::Error::other(format!("Failed to initialize IdP client: {e}")))?;

    start_server(idp_client, &settings).await
}

/// Start the server with stateless cookie sessions
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(idp_client: IdpClient, settings: &RelaySettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, settings);

    let session_manager = SessionManager::from_settings(settings);

    let idp: Arc<dyn IdentityProvider> = Arc::new(idp_client);
    let idp_data: web::Data<dyn IdentityProvider> = web::Data::from(idp);

    // Configure CORS for the login front-end
    let cors_origins = settings.get_cors_origins();

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(idp_data.clone())
            .app_data(web::Data::new(session_manager.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg
        // Sign-in endpoints, one per credential kind
        .route("/auth/login", web::post().to(password_login))
        .route("/auth/otp/request", web::post().to(otp_request))
        .route("/auth/otp/verify", web::post().to(otp_verify))
        .route("/auth/oauth/login", web::post().to(oauth_login))
        // Session endpoints
        .route("/auth/userinfo", web::get().to(userinfo))
        .route("/auth/sign_out", web::get().to(sign_out))
        .route("/auth/sign_out", web::post().to(sign_out))
        // Health endpoint
        .route("/ping", web::get().to(health));
}

fn print_startup_info(bind_address: &str, settings: &RelaySettings) {
    println!("Starting Authrelay Authentication Gateway on http://{bind_address}");
    println!();
    println!("Sign-in endpoints:");
    println!("  POST /auth/login       - Password sign-in");
    println!("  POST /auth/otp/request - Request a one-time passcode");
    println!("  POST /auth/otp/verify  - Verify a one-time passcode");
    println!("  POST /auth/oauth/login - OAuth assertion sign-in");
    println!();
    println!("Session endpoints:");
    println!("  GET  /auth/userinfo    - Current session info");
    println!("  GET|POST /auth/sign_out - Clear session");
    println!();
    println!("System endpoints:");
    println!("  GET  /ping            - Health check");
    println!();
    println!("Upstream identity provider: {}", settings.idp.base_url);
    println!(
        "Upstream request timeout: {}s",
        settings.idp.timeout_seconds
    );
}
