use bytes::Bytes;

/// Content types accepted for reference clips
pub const WAV_CONTENT_TYPES: &[&str] = &["audio/wav", "audio/x-wav"];

/// Reference clip received from a multipart upload
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl AudioUpload {
    pub fn new(file_name: Option<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            file_name,
            content_type,
            data,
        }
    }

    pub fn is_wav(&self) -> bool {
        self.content_type.as_deref().is_some_and(is_wav_content_type)
    }
}

/// Match on the media type essence, ignoring parameters and case
pub fn is_wav_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    WAV_CONTENT_TYPES.contains(&essence.as_str())
}
