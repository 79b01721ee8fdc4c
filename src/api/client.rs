use crate::api::endpoint::Endpoint;
use crate::api::error::ApiError;
use crate::auth::signer::SignedHeaders;
use log::{debug, warn};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.euskadi.eus";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Performs one request against the API and returns its parsed JSON body.
///
/// Non-success responses and unparsable bodies are reported as [`ApiError`]s;
/// callers decide what a failure means through [`ApiError::class`].
pub trait ApiClient: Send + Sync {
    fn fetch(&self, endpoint: &Endpoint, headers: &SignedHeaders) -> Result<Value, ApiError>;
}

/// Connection settings for [`HttpApiClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Blocking HTTP implementation of [`ApiClient`].
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: String,
    http: Client,
}

impl HttpApiClient {
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(options.timeout)
            .user_agent(format!("euskalmet-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl ApiClient for HttpApiClient {
    fn fetch(&self, endpoint: &Endpoint, headers: &SignedHeaders) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .headers(headers.as_map().clone())
            .send()
            .map_err(|e| ApiError::Network {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if status.as_u16() >= 300 {
            debug!("HTTP {} for {}", status, url);
            return Err(ApiError::HttpStatus {
                url,
                status,
                reason: status.canonical_reason().map(str::to_string),
            });
        }

        let body = response.text().map_err(|e| ApiError::Network {
            url: url.clone(),
            source: e,
        })?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("Response from {} is not valid JSON", url);
            ApiError::Json { url, source: e }
        })
    }
}
