pub mod http_engine;

pub use http_engine::HttpVoiceEngine;

use crate::domain::voice::{Device, SynthesisParams, VoiceProfile};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::path::Path;

/// Lazy, forward-only sequence of audio chunks produced by the engine
pub type AudioStream = BoxStream<'static, Result<Bytes, EngineError>>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("engine unavailable: {0}")]
    Unavailable(String),
    #[error("engine rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected engine response: {0}")]
    Protocol(String),
    #[error("{0}")]
    Inference(String),
}

/// Everything the engine needs to synthesize one utterance
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub language: String,
    pub voice_profile: VoiceProfile,
    pub params: SynthesisParams,
}

/// The voice cloning / TTS model.
///
/// Constructed once at process start and shared by every request; all
/// inference happens behind this trait. Implementations are responsible for
/// their own thread safety.
#[async_trait]
pub trait VoiceEngine: Send + Sync {
    /// Device the model runs on; decoded profiles are placed here
    fn device(&self) -> Device;

    /// Extract speaker embedding and conditioning latents from a WAV file
    ///
    /// # Arguments
    /// * `audio_path` - Reference clip on local disk, valid for the duration of the call
    async fn get_conditioning_latents(&self, audio_path: &Path)
        -> Result<VoiceProfile, EngineError>;

    /// Start streaming synthesis
    ///
    /// Audio is generated incrementally as the returned stream is polled.
    /// Dropping the stream stops generation.
    async fn tts_stream(&self, request: SynthesisRequest) -> Result<AudioStream, EngineError>;

    /// Language codes the model supports, in model order
    async fn supported_languages(&self) -> Result<Vec<String>, EngineError>;

    /// Cheap liveness probe used by the readiness endpoint
    async fn health_check(&self) -> Result<(), EngineError>;
}
