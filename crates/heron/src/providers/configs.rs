use anyhow::{anyhow, Result};

pub const DEFAULT_HOST: &str = "https://api.x.ai";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Connection settings for the xAI chat completions endpoint.
#[derive(Debug, Clone)]
pub struct XaiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub max_tokens: u32,
}

impl XaiProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: api_key.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Read the API key from GROK_API_KEY, falling back to XAI_API_KEY.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROK_API_KEY")
            .or_else(|_| std::env::var("XAI_API_KEY"))
            .map_err(|_| {
                anyhow!("GROK_API_KEY or XAI_API_KEY environment variable must be set")
            })?;
        Ok(Self::new(api_key))
    }
}
