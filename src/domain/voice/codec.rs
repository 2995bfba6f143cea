use super::error::VoiceServiceError;
use super::profile::VoiceProfile;
use super::upload::{AudioUpload, WAV_CONTENT_TYPES};
use crate::infrastructure::engine::{EngineError, VoiceEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Converts reference clips into profile tokens and tokens back into
/// engine-ready profiles.
pub struct ProfileCodec {
    engine: Arc<dyn VoiceEngine>,
    temp_dir: Option<PathBuf>,
}

impl ProfileCodec {
    pub fn new(engine: Arc<dyn VoiceEngine>, temp_dir: Option<PathBuf>) -> Self {
        Self { engine, temp_dir }
    }

    /// Extract a voice profile from an uploaded clip and encode it as a token.
    ///
    /// The clip is written to a transient `.wav` file for the engine. The file
    /// is removed before this returns, on success and on every error path.
    pub async fn encode(&self, upload: &AudioUpload) -> Result<String, VoiceServiceError> {
        if !upload.is_wav() {
            return Err(VoiceServiceError::UnsupportedFormat(format!(
                "expected one of {}, got {}. Please upload a .wav file",
                WAV_CONTENT_TYPES.join(", "),
                upload.content_type.as_deref().unwrap_or("no content type")
            )));
        }

        if upload.data.is_empty() {
            return Err(VoiceServiceError::Invalid(
                "uploaded file is empty".to_string(),
            ));
        }

        let temp_file = self.create_temp_file()?;
        tokio::fs::write(temp_file.path(), &upload.data).await?;

        tracing::debug!(
            path = %temp_file.path().display(),
            file_name = ?upload.file_name,
            audio_size_bytes = upload.data.len(),
            "Reference clip written to transient file"
        );

        let extracted = self.engine.get_conditioning_latents(temp_file.path()).await;

        let path = temp_file.path().to_path_buf();
        if let Err(e) = temp_file.close() {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove transient reference clip"
            );
        }

        let profile = extracted.map_err(VoiceServiceError::Engine)?;
        profile
            .to_token()
            .map_err(|e| VoiceServiceError::Engine(EngineError::Protocol(e.to_string())))
    }

    /// Decode a client token onto the engine's device
    pub fn decode(&self, token: &str) -> Result<VoiceProfile, VoiceServiceError> {
        Ok(VoiceProfile::from_token(token, self.engine.device())?)
    }

    fn create_temp_file(&self) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("voice-ref-").suffix(".wav");

        match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}
