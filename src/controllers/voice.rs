use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use futures::StreamExt;
use std::sync::Arc;

use super::extract::AppJson;
use crate::{
    domain::voice::{
        AudioUpload, CloneVoiceResponse, LanguagesResponse, TtsStreamRequest, VoiceService,
        VoiceServiceApi,
    },
    error::{AppError, AppResult},
};

/// Multipart field carrying the reference clip
pub const WAV_FILE_FIELD: &str = "wav_file";

/// Media type of the synthesized stream
pub const AUDIO_RAW: &str = "audio/raw";

pub struct VoiceController {
    voice_service: Arc<VoiceService>,
}

impl VoiceController {
    pub fn new(voice_service: Arc<VoiceService>) -> Self {
        Self { voice_service }
    }

    /// POST /clone_voice - Create a voice profile from a reference WAV
    pub async fn clone_voice(
        State(controller): State<Arc<VoiceController>>,
        multipart: Multipart,
    ) -> AppResult<Json<CloneVoiceResponse>> {
        let upload = read_wav_field(multipart).await?;

        let voice_profile_b64 = controller
            .voice_service
            .create_voice_profile(upload)
            .await?;

        Ok(Json(CloneVoiceResponse { voice_profile_b64 }))
    }

    /// POST /tts_stream - Stream synthesized speech for a voice profile
    pub async fn tts_stream(
        State(controller): State<Arc<VoiceController>>,
        AppJson(request): AppJson<TtsStreamRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let audio = controller.voice_service.synthesize_stream(request).await?;

        // The response has already started once chunks flow; a failure here
        // can only be logged before the connection is cut.
        let audio = audio.inspect(|chunk| {
            if let Err(e) = chunk {
                tracing::error!(error = %e, "TTS stream aborted mid-response");
            }
        });

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_RAW));

        Ok((StatusCode::OK, headers, Body::from_stream(audio)))
    }

    /// GET /supported_languages - List languages the engine can speak
    pub async fn supported_languages(
        State(controller): State<Arc<VoiceController>>,
    ) -> AppResult<Json<LanguagesResponse>> {
        let languages = controller.voice_service.list_languages().await?;

        Ok(Json(LanguagesResponse { languages }))
    }
}

/// Pull the `wav_file` part out of a multipart body, skipping other fields
async fn read_wav_field(mut multipart: Multipart) -> AppResult<AudioUpload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(WAV_FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        return Ok(AudioUpload::new(file_name, content_type, data));
    }

    Err(AppError::Validation(format!(
        "missing multipart field '{}'",
        WAV_FILE_FIELD
    )))
}
