use std::sync::Arc;
use sentric_voice_api::controllers::voice::VoiceController;
use sentric_voice_api::domain::voice::VoiceService;
use sentric_voice_api::infrastructure::config::{Config, LogFormat};
use sentric_voice_api::infrastructure::engine::{HttpVoiceEngine, VoiceEngine};
use sentric_voice_api::infrastructure::http::{create_router, start_http_server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Sentric Voice API on {}:{}",
        config.host,
        config.port
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate the engine handle (lives for the whole process)
    let device = config.device();
    tracing::info!(
        engine_url = %config.engine_url,
        device = %device,
        "Connecting to inference engine"
    );
    let engine: Arc<dyn VoiceEngine> = Arc::new(HttpVoiceEngine::new(
        reqwest::Client::new(),
        config.engine_url.clone(),
        device,
    ));

    // Not fatal: the sidecar may still be loading model weights
    match engine.health_check().await {
        Ok(_) => tracing::info!("Inference engine reachable"),
        Err(e) => tracing::warn!(error = %e, "Inference engine not ready yet"),
    }

    // 2. Instantiate services (inject engine)
    let voice_service = Arc::new(VoiceService::new(engine.clone(), config.temp_dir.clone()));

    // 3. Instantiate controllers (inject services)
    let voice_controller = Arc::new(VoiceController::new(voice_service));

    // Start HTTP server with all routes
    let app = create_router(&config, engine, voice_controller);
    start_http_server(Arc::new(config), app)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "sentric_voice_api=debug,tower_http=debug"
    } else {
        "sentric_voice_api=info,tower_http=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
