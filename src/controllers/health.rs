use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::engine::VoiceEngine;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(engine): State<Arc<dyn VoiceEngine>>) -> impl IntoResponse {
    let device = engine.device().to_string();

    match engine.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "engine": "available",
                "device": device
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Engine health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "engine": "unavailable",
                    "device": device
                })),
            )
        }
    }
}
