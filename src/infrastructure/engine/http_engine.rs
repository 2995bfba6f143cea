use super::{AudioStream, EngineError, SynthesisRequest, VoiceEngine};
use crate::domain::voice::{Device, Tensor, VoiceProfile};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on a single health probe; inference calls stay unbounded
pub const DEFAULT_HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Body for the sidecar's POST /tts_stream
#[derive(Debug, Serialize)]
struct TtsStreamBody<'a> {
    text: &'a str,
    language: &'a str,
    speaker_embedding: &'a Tensor,
    gpt_cond_latents: &'a Tensor,
    speed: f64,
    temperature: f64,
    top_p: f64,
    device: String,
}

#[derive(Debug, Deserialize)]
struct LanguagesBody {
    languages: Vec<String>,
}

/// Engine backed by an inference sidecar reachable over HTTP.
///
/// The sidecar hosts the model; this adapter only moves files, tensors and
/// audio bytes across the wire.
pub struct HttpVoiceEngine {
    client: Client,
    base_url: String,
    device: Device,
    health_timeout: Duration,
}

impl HttpVoiceEngine {
    pub fn new(client: Client, base_url: impl Into<String>, device: Device) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            device,
            health_timeout: DEFAULT_HEALTH_CHECK_TIMEOUT,
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn non-2xx responses into `EngineError::Rejected` carrying the body text
    async fn ensure_success(response: Response) -> Result<Response, EngineError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            status = status.as_u16(),
            body = %body,
            "Engine returned an error response"
        );
        Err(EngineError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn unavailable(e: reqwest::Error) -> EngineError {
    EngineError::Unavailable(e.to_string())
}

#[async_trait]
impl VoiceEngine for HttpVoiceEngine {
    fn device(&self) -> Device {
        self.device
    }

    async fn get_conditioning_latents(
        &self,
        audio_path: &Path,
    ) -> Result<VoiceProfile, EngineError> {
        let start_time = std::time::Instant::now();

        let audio = tokio::fs::read(audio_path).await.map_err(|e| {
            EngineError::Inference(format!(
                "failed to read reference clip {}: {}",
                audio_path.display(),
                e
            ))
        })?;
        let audio_size = audio.len();

        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reference.wav".to_string());
        let part = Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| EngineError::Protocol(e.to_string()))?;
        let form = Form::new().part("wav_file", part);

        tracing::debug!(
            engine_url = %self.base_url,
            audio_size_bytes = audio_size,
            "Requesting conditioning latents"
        );

        let response = self
            .client
            .post(self.url("/conditioning_latents"))
            .multipart(form)
            .send()
            .await
            .map_err(unavailable)?;
        let response = Self::ensure_success(response).await?;

        let profile: VoiceProfile = response
            .json()
            .await
            .map_err(|e| EngineError::Protocol(format!("invalid conditioning latents: {}", e)))?;

        tracing::info!(
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_size,
            speaker_embedding_shape = ?profile.speaker_embedding.shape(),
            gpt_cond_latents_shape = ?profile.gpt_cond_latents.shape(),
            "Conditioning latents extracted"
        );

        Ok(profile.to_device(self.device))
    }

    async fn tts_stream(&self, request: SynthesisRequest) -> Result<AudioStream, EngineError> {
        let body = TtsStreamBody {
            text: &request.text,
            language: &request.language,
            speaker_embedding: &request.voice_profile.speaker_embedding,
            gpt_cond_latents: &request.voice_profile.gpt_cond_latents,
            speed: request.params.speed,
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            device: self.device.to_string(),
        };

        tracing::debug!(
            engine_url = %self.base_url,
            language = %request.language,
            text_length = request.text.len(),
            "Opening synthesis stream"
        );

        let response = self
            .client
            .post(self.url("/tts_stream"))
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;
        let response = Self::ensure_success(response).await?;

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| EngineError::Inference(e.to_string())));

        Ok(stream.boxed())
    }

    async fn supported_languages(&self) -> Result<Vec<String>, EngineError> {
        let response = self
            .client
            .get(self.url("/languages"))
            .send()
            .await
            .map_err(unavailable)?;
        let response = Self::ensure_success(response).await?;

        let body: LanguagesBody = response
            .json()
            .await
            .map_err(|e| EngineError::Protocol(format!("invalid language list: {}", e)))?;

        Ok(body.languages)
    }

    async fn health_check(&self) -> Result<(), EngineError> {
        let response = self
            .client
            .get(self.url("/health"))
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(unavailable)?;
        Self::ensure_success(response).await.map(|_| ())
    }
}
