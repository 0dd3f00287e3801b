use std::env;

/// Environment variable holding the server's base URL.
pub const URL_ENV: &str = "CHESSTEMPO_URL";

pub const DEFAULT_URL: &str = "http://127.0.0.1:9999";

/// Settings of the native client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    /// Reads [`URL_ENV`], falling back to [`DEFAULT_URL`] when it is unset
    /// or blank.
    pub fn from_env() -> Self {
        Self::from_url(env::var(URL_ENV).ok())
    }

    fn from_url(url: Option<String>) -> Self {
        let base_url = url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        Self { base_url }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_url(None)
    }
}
