use crate::error::{PlatformError, Result};
use crate::settings::ClientConfig;
use log::{debug, trace};
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{AuthUrl, ClientId, ClientSecret, Scope, TokenResponse, TokenUrl};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use url::Url;

/// Client for the PokitDok platform API.
///
/// Cloning is cheap, clones share the http client and the access token.
#[derive(Clone)]
pub struct PlatformClient {
    credentials: Arc<RwLock<Credentials>>,
    http_client: Client,
    config: ClientConfig,
    url_base: String,
    token_url: String,
}

impl PlatformClient {
    /// Creates a client and immediately exchanges the client credentials for an access token.
    ///
    /// Fails with [`PlatformError::Authentication`] when the token endpoint is unreachable or
    /// rejects the credentials, the client is unusable in that case.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        // Create the underlying http client, will be reused for every call
        let http_client = Client::new();
        let url_base = config.url_base();
        let token_url = config.token_url();

        trace!("Initial connect to '{}'", token_url);
        let credentials = Arc::new(RwLock::new(
            Self::get_bearer_token(&config, &token_url).await?,
        ));
        trace!(
            "Successfully connected: Got bearer token from {}",
            token_url
        );

        Ok(PlatformClient {
            credentials,
            http_client,
            config,
            url_base,
            token_url,
        })
    }

    async fn get_bearer_token(config: &ClientConfig, token_url: &str) -> Result<Credentials> {
        trace!("Preparing client credentials exchange");
        let oauth_client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            // Only the token endpoint is used by the client credentials grant
            AuthUrl::new(token_url.to_string())?,
            Some(TokenUrl::new(token_url.to_string())?),
        );

        let mut exchange_request = oauth_client.exchange_client_credentials();
        for scope in config.scopes.iter().cloned() {
            exchange_request = exchange_request.add_scope(Scope::new(scope));
        }

        let response = exchange_request
            .request_async(async_http_client)
            .await
            .map_err(|e| PlatformError::Authentication(Box::new(e)))?;

        trace!(
            "Exchanged client credentials for a bearer token (expires in {:?})",
            response.expires_in()
        );

        Ok(Credentials {
            access_token: response.access_token().secret().to_owned(),
            expires_at: response
                .expires_in()
                .and_then(|expires_in| Instant::now().checked_add(expires_in)),
        })
    }

    /// Exchanges the client credentials for a fresh access token and uses it for every
    /// following call. Tokens are never renewed automatically, this is the only way to
    /// replace an expired one.
    pub async fn fetch_access_token(&self) -> Result<String> {
        debug!("Refreshing bearer token");
        let fresh = Self::get_bearer_token(&self.config, &self.token_url).await?;
        let access_token = fresh.access_token.clone();

        *self.credentials.write().await = fresh;

        debug!("Refreshed bearer token");
        Ok(access_token)
    }

    pub async fn access_token(&self) -> String {
        self.credentials.read().await.access_token.clone()
    }

    /// When the current token expires, if the token endpoint told us.
    pub async fn token_expires_at(&self) -> Option<Instant> {
        self.credentials.read().await.expires_at
    }

    pub fn url_base(&self) -> &str {
        &self.url_base
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Fetch platform activity information, a single activity when `activity_id` is given.
    pub async fn activities(&self, activity_id: Option<&str>) -> Result<Value> {
        let url = self.resource_url("activities", activity_id)?;
        self.request_json(self.http_client.get(url)).await
    }

    /// Fetch cash price information.
    ///
    /// Query string filters are not supported yet, the full listing is always requested.
    pub async fn cash_prices(&self) -> Result<Value> {
        let url = self.resource_url("prices/cash", None)?;
        self.request_json(self.http_client.get(url)).await
    }

    /// Submit a claims request
    pub async fn claims<T>(&self, claims_request: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        self.post_json("claims", claims_request).await
    }

    /// Submit a claims status request
    pub async fn claims_status<T>(&self, claims_status_request: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        self.post_json("claims/status", claims_status_request).await
    }

    /// Submit an eligibility request
    pub async fn eligibility<T>(&self, eligibility_request: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        self.post_json("eligibility", eligibility_request).await
    }

    /// Submit a benefits enrollment/maintenance request
    pub async fn enrollment<T>(&self, enrollment_request: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        self.post_json("enrollment", enrollment_request).await
    }

    /// Submit a raw X12 file to the platform for processing.
    ///
    /// The file is read before anything is sent, a missing or unreadable file fails with
    /// [`PlatformError::FileNotFound`] without touching the network.
    pub async fn files(
        &self,
        trading_partner_id: &str,
        x12_file: impl AsRef<Path>,
    ) -> Result<Value> {
        let path = x12_file.as_ref();
        let contents = tokio::fs::read(path)
            .await
            .map_err(|source| PlatformError::FileNotFound {
                path: path.to_path_buf(),
                source,
            })?;
        trace!("Read {} bytes from '{}'", contents.len(), path.display());

        let mut file_part = Part::bytes(contents);
        if let Some(file_name) = path.file_name() {
            file_part = file_part.file_name(file_name.to_string_lossy().into_owned());
        }
        let form = Form::new()
            .text("trading_partner_id", trading_partner_id.to_string())
            .part("file", file_part);

        let url = self.resource_url("files", None)?;
        self.request_json(self.http_client.post(url).multipart(form))
            .await
    }

    /// Fetch health care provider information, a single provider when `provider_id` is given.
    ///
    /// Query string filters are not supported yet.
    pub async fn providers(&self, provider_id: Option<&str>) -> Result<Value> {
        let url = self.resource_url("providers", provider_id)?;
        self.request_json(self.http_client.get(url)).await
    }

    fn resource_url(&self, resource: &str, id: Option<&str>) -> Result<Url> {
        let url = match id {
            Some(id) => format!("{}/{}/{}", self.url_base, resource, id),
            None => format!("{}/{}/", self.url_base, resource),
        };
        Ok(Url::parse(&url)?)
    }

    async fn post_json<T>(&self, resource: &str, body: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let url = self.resource_url(resource, None)?;
        // `json` also sets `Content-Type: application/json`
        self.request_json(self.http_client.post(url).json(body))
            .await
    }

    async fn request_json<R>(&self, request: RequestBuilder) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let access_token = self.credentials.read().await.access_token.clone();

        // The status code is not inspected, error bodies are decoded like any other
        let response = request.bearer_auth(access_token).send().await?;
        trace!("{} answered with {}", response.url(), response.status());

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

struct Credentials {
    access_token: String,
    expires_at: Option<Instant>,
}
