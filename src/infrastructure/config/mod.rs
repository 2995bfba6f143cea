use crate::domain::voice::Device;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Default cap on multipart upload bodies: 50 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Inference engine
    pub engine_url: String,
    pub use_cuda: bool,
    // Uploads
    pub max_upload_bytes: usize,
    pub temp_dir: Option<PathBuf>,
    // Serve /clone-voice, /tts-stream and /supported-languages as well
    pub legacy_routes: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            engine_url: env::var("ENGINE_URL")?,
            use_cuda: parse_flag("USE_CUDA", false),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .map(|v| v.parse())
                .unwrap_or(Ok(DEFAULT_MAX_UPLOAD_BYTES))?,
            temp_dir: env::var("TEMP_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            legacy_routes: parse_flag("LEGACY_ROUTES", true),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Device handed to the engine at construction
    pub fn device(&self) -> Device {
        Device::from_cuda_flag(self.use_cuda)
    }
}

fn parse_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}
