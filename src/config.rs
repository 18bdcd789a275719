use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for the outbound LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    /// Chat model able to return audio alongside text.
    pub audio_model: String,
    pub tts_model: String,
    pub stt_model: String,
    pub voice: String,
    pub audio_format: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            text_model: "gpt-4o-mini".to_string(),
            audio_model: "gpt-4o-mini-audio-preview".to_string(),
            tts_model: "gpt-4o-mini-tts".to_string(),
            stt_model: "gpt-4o-mini-transcribe".to_string(),
            voice: "alloy".to_string(),
            audio_format: "mp3".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Process configuration, built once at startup and shared through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub app_version: String,
    pub environment: String,
    pub log_level: String,
    pub log_dir: String,
    pub llm: LlmConfig,
    /// Number of previous messages sent to the provider as context.
    pub history_limit: i64,
    pub require_agent_prompt: bool,
    pub media_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: "sqlite://parley.db".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "Development".to_string(),
            log_level: "debug".to_string(),
            log_dir: "./logs".to_string(),
            llm: LlmConfig::default(),
            history_limit: 10,
            require_agent_prompt: true,
            media_dir: PathBuf::from("./media"),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Read configuration from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let llm_defaults = LlmConfig::default();

        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let logging = LogSettings::from_lookup(&lookup);

        let timeout_secs: u64 = parse_or("LLM_TIMEOUT_SECS", &lookup, llm_defaults.timeout.as_secs())?;
        let max_upload_mb: usize = parse_or("MAX_UPLOAD_MB", &lookup, 25)?;
        let max_upload_bytes = max_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| ConfigError::Invalid { key: "MAX_UPLOAD_MB", value: max_upload_mb.to_string() })?;

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", &lookup, defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            app_version: lookup("APP_VERSION").unwrap_or(defaults.app_version),
            log_level: logging.log_level,
            environment: logging.environment,
            log_dir: logging.log_dir,
            llm: LlmConfig {
                api_key,
                base_url: lookup("OPENAI_BASE_URL").unwrap_or(llm_defaults.base_url),
                text_model: lookup("LLM_TEXT_MODEL").unwrap_or(llm_defaults.text_model),
                audio_model: lookup("LLM_AUDIO_MODEL").unwrap_or(llm_defaults.audio_model),
                tts_model: lookup("LLM_TTS_MODEL").unwrap_or(llm_defaults.tts_model),
                stt_model: lookup("LLM_STT_MODEL").unwrap_or(llm_defaults.stt_model),
                voice: lookup("LLM_VOICE").unwrap_or(llm_defaults.voice),
                audio_format: lookup("LLM_AUDIO_FORMAT").unwrap_or(llm_defaults.audio_format),
                timeout: Duration::from_secs(timeout_secs),
            },
            history_limit: parse_or("HISTORY_LIMIT", &lookup, defaults.history_limit)?,
            require_agent_prompt: parse_bool_or("REQUIRE_AGENT_PROMPT", &lookup, defaults.require_agent_prompt)?,
            media_dir: lookup("MEDIA_DIR").map(PathBuf::from).unwrap_or(defaults.media_dir),
            max_upload_bytes,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging settings, readable without provider credentials.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub environment: String,
    pub log_level: String,
    pub log_dir: String,
}

impl LogSettings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let environment = lookup("ENV").unwrap_or(defaults.environment);
        let default_level = if environment.eq_ignore_ascii_case("development") {
            "debug"
        } else {
            "info"
        };

        Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| default_level.to_string()),
            log_dir: lookup("LOG_DIR").unwrap_or(defaults.log_dir),
            environment,
        }
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_bool_or<F>(key: &'static str, lookup: &F, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}
