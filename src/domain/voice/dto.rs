use super::error::VoiceServiceError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const SPEED_RANGE: RangeInclusive<f64> = 0.5..=2.0;
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const TOP_P_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Request for POST /tts_stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsStreamRequest {
    pub text: String,
    pub language: String,
    /// Token returned by POST /clone_voice
    pub voice_profile_b64: String,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

fn default_speed() -> f64 {
    1.0
}

fn default_temperature() -> f64 {
    0.75
}

fn default_top_p() -> f64 {
    0.85
}

impl TtsStreamRequest {
    /// Check the sampling controls and pull them out of the request
    pub fn params(&self) -> Result<SynthesisParams, VoiceServiceError> {
        check_range("speed", self.speed, &SPEED_RANGE)?;
        check_range("temperature", self.temperature, &TEMPERATURE_RANGE)?;
        check_range("top_p", self.top_p, &TOP_P_RANGE)?;

        Ok(SynthesisParams {
            speed: self.speed,
            temperature: self.temperature,
            top_p: self.top_p,
        })
    }
}

fn check_range(
    name: &str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), VoiceServiceError> {
    // NaN fails `contains`, so it is rejected here too
    if range.contains(&value) {
        Ok(())
    } else {
        Err(VoiceServiceError::Invalid(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

/// Validated synthesis controls forwarded to the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisParams {
    pub speed: f64,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

/// Response for POST /clone_voice
#[derive(Debug, Serialize, Deserialize)]
pub struct CloneVoiceResponse {
    pub voice_profile_b64: String,
}

/// Response for GET /supported_languages
#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub languages: Vec<String>,
}
