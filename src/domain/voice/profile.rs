use super::tensor::{Device, Tensor, TensorError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("not a valid profile document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tensor cannot be encoded: {0}")]
    Tensor(#[from] TensorError),
}

/// Speaker conditioning extracted from a reference clip.
///
/// Transport form is `base64(json({"speaker_embedding", "gpt_cond_latents"}))`.
/// Exactly those two keys are accepted on decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceProfile {
    pub speaker_embedding: Tensor,
    pub gpt_cond_latents: Tensor,
}

impl VoiceProfile {
    pub fn new(speaker_embedding: Tensor, gpt_cond_latents: Tensor) -> Self {
        Self {
            speaker_embedding,
            gpt_cond_latents,
        }
    }

    /// Device of the speaker embedding; both tensors always share one
    pub fn device(&self) -> Device {
        self.speaker_embedding.device()
    }

    pub fn to_device(self, device: Device) -> Self {
        Self {
            speaker_embedding: self.speaker_embedding.to_device(device),
            gpt_cond_latents: self.gpt_cond_latents.to_device(device),
        }
    }

    /// Encode into the opaque token handed to clients
    pub fn to_token(&self) -> Result<String, ProfileError> {
        let document = serde_json::json!({
            "speaker_embedding": self.speaker_embedding.to_json()?,
            "gpt_cond_latents": self.gpt_cond_latents.to_json()?,
        });
        Ok(STANDARD.encode(serde_json::to_vec(&document)?))
    }

    /// Decode a client token and place both tensors on `device`
    pub fn from_token(token: &str, device: Device) -> Result<Self, ProfileError> {
        let json = STANDARD.decode(token.trim())?;
        // Go through a map so a bare two-element array is not accepted as a profile
        let document: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&json)?;
        let profile: VoiceProfile = serde_json::from_value(serde_json::Value::Object(document))?;
        Ok(profile.to_device(device))
    }
}
