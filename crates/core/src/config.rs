use crate::error::{Result, TubemarkError};

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub const CHANNEL_ID_ENV: &str = "YOUTUBE_CHANNEL_ID";
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Credentials and endpoint for the YouTube Data API.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use the explicit key if given, otherwise `YOUTUBE_API_KEY`.
    pub fn resolve(explicit: Option<String>) -> Result<Self> {
        resolve_with(explicit, API_KEY_ENV, |var| std::env::var(var).ok()).map(Self::new)
    }
}

/// Use the explicit channel id if given, otherwise `YOUTUBE_CHANNEL_ID`.
pub fn resolve_channel_id(explicit: Option<String>) -> Result<String> {
    resolve_with(explicit, CHANNEL_ID_ENV, |var| std::env::var(var).ok())
}

fn resolve_with(
    explicit: Option<String>,
    env_var: &'static str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    explicit
        .or_else(|| lookup(env_var))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(TubemarkError::MissingConfig { env_var })
}
