use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://www.flickr.com/services/rest";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Process configuration, resolved once at startup.
#[derive(Debug)]
pub struct Config {
    /// Bearer token callers must present.
    pub api_token: SecretString,
    /// Upstream API key.
    pub api_key: SecretString,
    pub api_url: String,
    pub bind_addr: String,
}

impl Config {
    pub fn new(
        api_token: impl Into<String>,
        api_key: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            api_token: SecretString::from(api_token.into()),
            api_key: SecretString::from(api_key.into()),
            api_url: api_url.into(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }

    /// Reads `API_TOKEN`, `API_KEY`, `API_URL` and `BIND_ADDR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let api_token = required("API_TOKEN")?;
        let api_key = required("API_KEY")?;
        let api_url = lookup("API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            api_token: SecretString::from(api_token),
            api_key: SecretString::from(api_key),
            api_url,
            bind_addr,
        })
    }
}
