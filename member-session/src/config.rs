use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use crate::error::ClientError;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Root of association-service, without the `/api` prefix.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sent as a bearer token. Without it the client relies on the session cookie.
    #[serde(default)]
    pub access_token: Option<Secret<String>>,
}

fn default_timeout_secs() -> u64 {
    10
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(Secret::new(token.into()));
        self
    }

    /// Reads `SESSION__BASE_URL`, `SESSION__TIMEOUT_SECS` and `SESSION__ACCESS_TOKEN`.
    pub fn load() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("base_url", "http://localhost:8080")?
            .add_source(config::Environment::with_prefix("SESSION").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
