pub mod codec;
pub mod dto;
pub mod error;
pub mod profile;
pub mod service;
pub mod tensor;
pub mod upload;

pub use codec::ProfileCodec;
pub use dto::{CloneVoiceResponse, LanguagesResponse, SynthesisParams, TtsStreamRequest};
pub use error::VoiceServiceError;
pub use profile::{ProfileError, VoiceProfile};
pub use service::{VoiceService, VoiceServiceApi};
pub use tensor::{Device, Tensor, TensorError};
pub use upload::{is_wav_content_type, AudioUpload};
