use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { name: &'static str, value: String },
}

/// Settings read from the environment (and `.env`) at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub telegram_token: String,
    pub chatgpt_api_key: String,
    pub chatgpt_timeout: Duration,
    pub dialogue_db: String,
    pub verb_catalog: Option<PathBuf>,
    pub tts_model: String,
    pub tts_voice: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let telegram_token =
            get("TELOXIDE_TOKEN").ok_or(ConfigError::Missing("TELOXIDE_TOKEN"))?;
        let chatgpt_api_key =
            get("CHATGPT_API_KEY").ok_or(ConfigError::Missing("CHATGPT_API_KEY"))?;

        let chatgpt_timeout = match get("CHATGPT_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeconds {
                        name: "CHATGPT_TIMEOUT_SECS",
                        value: value.clone(),
                    })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(15),
        };

        Ok(Self {
            telegram_token,
            chatgpt_api_key,
            chatgpt_timeout,
            dialogue_db: get("DIALOGUE_DB").unwrap_or_else(|| "db.sqlite".to_string()),
            verb_catalog: get("VERB_CATALOG").map(PathBuf::from),
            tts_model: get("TTS_MODEL").unwrap_or_else(|| "tts-1".to_string()),
            tts_voice: get("TTS_VOICE").unwrap_or_else(|| "nova".to_string()),
        })
    }
}
