//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{CompletionDefaults, OpenAiCompletionAdapter, SmtpMailer},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::{AppState, SessionStore}},
};
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use axum::Router;
use email_assistant_core::composer::{ComposerSettings, EmailComposer};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    // A missing API key is fatal here, before any request reaches the provider.
    let completion = Arc::new(OpenAiCompletionAdapter::new(
        config.groq_api_key.as_deref(),
        &config.completion_api_base,
        CompletionDefaults {
            model: config.completion_model.clone(),
            temperature: config.completion_temperature,
            max_tokens: config.completion_max_tokens,
        },
    )?);
    info!(
        "Completion provider at {} using model {}",
        config.completion_api_base, config.completion_model
    );

    if config.smtp_password.is_none() {
        warn!("SMTP_PASSWORD is not set; sending email will fail until it is configured");
    }
    let composer = Arc::new(EmailComposer::new(
        Arc::new(SmtpMailer::new()),
        ComposerSettings {
            smtp_password: config.smtp_password.clone(),
            custom_host: config.smtp_host.clone(),
            custom_port: config.smtp_port,
        },
    ));

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        completion,
        composer,
        sessions: Arc::new(SessionStore::new(
            chrono::Duration::minutes(config.session_ttl_minutes),
            config.max_sessions,
        )),
    });

    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(web::router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
