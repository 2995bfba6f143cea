pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, voice::VoiceController};
use crate::infrastructure::config::Config;
use crate::infrastructure::engine::VoiceEngine;

/// Build the application router with all routes configured
pub fn create_router(
    config: &Config,
    engine: Arc<dyn VoiceEngine>,
    voice_controller: Arc<VoiceController>,
) -> Router {
    // Voice routes (snake_case is canonical)
    let mut voice_routes: Router<Arc<VoiceController>> = Router::new()
        .route("/clone_voice", post(VoiceController::clone_voice))
        .route("/tts_stream", post(VoiceController::tts_stream))
        .route(
            "/supported_languages",
            get(VoiceController::supported_languages),
        );

    // Hyphenated spellings served by earlier releases
    if config.legacy_routes {
        voice_routes = voice_routes
            .route("/clone-voice", post(VoiceController::clone_voice))
            .route("/tts-stream", post(VoiceController::tts_stream))
            .route(
                "/supported-languages",
                get(VoiceController::supported_languages),
            );
    }

    let voice_routes = voice_routes
        .with_state(voice_controller)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    // Health routes (probe the engine, never touch uploads)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(engine);

    Router::new().merge(health_routes).merge(voice_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(request_id_middleware)),
    )
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
