use super::profile::ProfileError;
use crate::error::AppError;
use crate::infrastructure::engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum VoiceServiceError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    MalformedProfile(#[from] ProfileError),
    #[error("voice profile extraction failed: {0}")]
    Engine(EngineError),
    #[error("synthesis failed: {0}")]
    Synthesis(EngineError),
    #[error("failed to list languages: {0}")]
    Languages(EngineError),
    #[error("temporary file error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<VoiceServiceError> for AppError {
    fn from(err: VoiceServiceError) -> Self {
        match err {
            VoiceServiceError::UnsupportedFormat(msg) => AppError::UnsupportedFormat(msg),
            VoiceServiceError::Invalid(msg) => AppError::Validation(msg),
            VoiceServiceError::MalformedProfile(e) => AppError::MalformedProfile(e.to_string()),
            VoiceServiceError::Synthesis(e) => AppError::Synthesis(e.to_string()),
            err @ (VoiceServiceError::Engine(_) | VoiceServiceError::Languages(_)) => {
                AppError::Engine(err.to_string())
            }
            VoiceServiceError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}
