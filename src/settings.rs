use crate::error::{PlatformError, Result};
use serde::Deserialize;
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://platform.pokitdok.com";
pub const DEFAULT_API_VERSION: &str = "v3";

/// Credentials and endpoint location of a PokitDok platform application.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Extra scopes for the client credentials grant, the platform itself needs none
    #[serde(default)]
    pub scopes: Vec<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        ClientConfig {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: default_base_url(),
            api_version: default_api_version(),
            scopes: Vec::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Builds a config from `POKITDOK_CLIENT_ID`, `POKITDOK_CLIENT_SECRET` and the optional
    /// `POKITDOK_BASE_URL` / `POKITDOK_API_VERSION` environment variables.
    pub fn from_env() -> Result<Self> {
        let required = |key: &str| {
            env::var(key)
                .map_err(|e| PlatformError::MissingConfig(format!("{} must be set: {}", key, e)))
        };

        let mut config = ClientConfig::new(
            required("POKITDOK_CLIENT_ID")?,
            required("POKITDOK_CLIENT_SECRET")?,
        );
        if let Ok(base_url) = env::var("POKITDOK_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(api_version) = env::var("POKITDOK_API_VERSION") {
            config.api_version = api_version;
        }

        Ok(config)
    }

    /// Root of every resource endpoint: `{base_url}/api/{api_version}`
    pub fn url_base(&self) -> String {
        format!("{}/api/{}", self.trimmed_base_url(), self.api_version)
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.trimmed_base_url())
    }

    fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
