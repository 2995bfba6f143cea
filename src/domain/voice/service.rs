use super::codec::ProfileCodec;
use super::dto::TtsStreamRequest;
use super::error::VoiceServiceError;
use super::upload::AudioUpload;
use crate::infrastructure::engine::{AudioStream, SynthesisRequest, VoiceEngine};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;

pub struct VoiceService {
    engine: Arc<dyn VoiceEngine>,
    codec: ProfileCodec,
}

impl VoiceService {
    pub fn new(engine: Arc<dyn VoiceEngine>, temp_dir: Option<PathBuf>) -> Self {
        let codec = ProfileCodec::new(engine.clone(), temp_dir);
        Self { engine, codec }
    }
}

#[async_trait]
pub trait VoiceServiceApi: Send + Sync {
    /// Create a reusable voice profile token from a reference WAV clip
    async fn create_voice_profile(&self, upload: AudioUpload)
        -> Result<String, VoiceServiceError>;

    /// Synthesize `request.text` in the profile's voice
    ///
    /// This operation:
    /// - Validates speed, temperature and top_p before touching the engine
    /// - Decodes the profile onto the engine's device
    /// - Waits for the first audio chunk so early failures surface as errors
    ///
    /// Chunks after the first are forwarded as the engine produces them.
    async fn synthesize_stream(
        &self,
        request: TtsStreamRequest,
    ) -> Result<AudioStream, VoiceServiceError>;

    /// Language codes supported by the engine
    async fn list_languages(&self) -> Result<Vec<String>, VoiceServiceError>;
}

#[async_trait]
impl VoiceServiceApi for VoiceService {
    async fn create_voice_profile(
        &self,
        upload: AudioUpload,
    ) -> Result<String, VoiceServiceError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            file_name = ?upload.file_name,
            content_type = ?upload.content_type,
            audio_size_bytes = upload.data.len(),
            "Voice profile request"
        );

        let token = self.codec.encode(&upload).await?;

        tracing::info!(
            latency_ms = start_time.elapsed().as_millis(),
            token_length = token.len(),
            "Voice profile created"
        );

        Ok(token)
    }

    async fn synthesize_stream(
        &self,
        request: TtsStreamRequest,
    ) -> Result<AudioStream, VoiceServiceError> {
        let params = request.params()?;
        let voice_profile = self.codec.decode(&request.voice_profile_b64)?;

        tracing::info!(
            language = %request.language,
            text_length = request.text.len(),
            speed = params.speed,
            temperature = params.temperature,
            top_p = params.top_p,
            device = %voice_profile.device(),
            "TTS stream request"
        );

        let start_time = std::time::Instant::now();
        let mut audio = self
            .engine
            .tts_stream(SynthesisRequest {
                text: request.text,
                language: request.language,
                voice_profile,
                params,
            })
            .await
            .map_err(VoiceServiceError::Synthesis)?;

        let first_chunk = match audio.next().await {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => return Err(VoiceServiceError::Synthesis(e)),
            None => {
                tracing::warn!("Engine finished without producing audio");
                return Ok(stream::empty().boxed());
            }
        };

        tracing::info!(
            time_to_first_chunk_ms = start_time.elapsed().as_millis(),
            first_chunk_bytes = first_chunk.len(),
            "TTS stream started"
        );

        Ok(stream::once(async move { Ok(first_chunk) })
            .chain(audio)
            .boxed())
    }

    async fn list_languages(&self) -> Result<Vec<String>, VoiceServiceError> {
        self.engine
            .supported_languages()
            .await
            .map_err(VoiceServiceError::Languages)
    }
}
