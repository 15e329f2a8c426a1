//! HTTP client helper shared by all widget adapters.
//!
//! Every upstream call in LabDash goes through [`ServiceClient`], which is the
//! single place where network failures (unreachable host, timeout, non-2xx
//! status, malformed JSON) are turned into a [`FetchError`] value. Nothing
//! here panics or lets a transport error escape in any other form.
//!
//! # Example
//!
//! ```no_run
//! use labdash::client::{Credential, SharedClient, API_KEY_HEADER};
//! use labdash::config::FetchConfig;
//!
//! # async fn example() -> Result<(), labdash::client::FetchError> {
//! let shared = SharedClient::from_config(&FetchConfig::default())?;
//! let sonarr = shared.service(
//!     "http://localhost:8989",
//!     Some(Credential::new(API_KEY_HEADER, "secret")),
//! );
//! let status = sonarr.get("/api/v3/system/status").await?;
//! println!("{}", status["version"]);
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::FetchError;

use crate::config::FetchConfig;
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Generic API-key header used by the *arr family and Bazarr.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Vendor token header understood by Jellyfin (and Emby).
pub const EMBY_TOKEN_HEADER: &str = "X-Emby-Token";

/// An authentication header attached to every request of one service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    header: &'static str,
    value: String,
}

impl Credential {
    pub fn new(header: &'static str, value: impl Into<String>) -> Self {
        Self {
            header,
            value: value.into(),
        }
    }

    pub fn header(&self) -> &'static str {
        self.header
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("header", &self.header)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Pooled HTTP client plus the per-request deadline.
///
/// Cheap to clone; adapters built from the same registry share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct SharedClient {
    http: Arc<Client>,
    timeout: Duration,
}

impl SharedClient {
    pub fn new(http: Arc<Client>, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// Build the pooled client from the `[fetch]` configuration section.
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .user_agent(concat!("labdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(
            Arc::new(http),
            Duration::from_secs(config.timeout_seconds),
        ))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Bind the shared pool to one service's base URL and credential.
    pub fn service(&self, base_url: &str, credential: Option<Credential>) -> ServiceClient {
        ServiceClient {
            http: Arc::clone(&self.http),
            base_url: base_url.to_string(),
            credential,
            timeout: self.timeout,
        }
    }
}

/// Authenticated GET helper bound to a single service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Arc<Client>,
    base_url: String,
    credential: Option<Credential>,
    timeout: Duration,
}

impl ServiceClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `path` against the configured base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        resolve_url(&self.base_url, path)
    }

    /// GET `path` and return the parsed JSON body.
    pub async fn get(&self, path: &str) -> Result<Value, FetchError> {
        self.get_json(path).await
    }

    /// GET `path` and deserialize the body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.get_json_with_headers(path, &[]).await
    }

    /// GET `path` with additional request headers.
    ///
    /// Extra headers are applied after the credential header, so an adapter
    /// may override it for a single call.
    pub async fn get_json_with_headers<T: DeserializeOwned>(
        &self,
        path: &str,
        extra_headers: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.resolve(path)?;

        let mut request = self.http.get(url.clone()).timeout(self.timeout);
        if let Some(credential) = &self.credential {
            request = request.header(credential.header, &credential.value);
        }
        for (name, value) in extra_headers {
            request = request.header(*name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_ms()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "Upstream returned error status");
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_ms()))?;

        serde_json::from_str(&body).map_err(|e| {
            FetchError::InvalidResponse(format!("Failed to parse response from {}: {}", url.path(), e))
        })
    }

    /// POST an url-encoded form and return the response headers and body.
    ///
    /// Only used for session logins; the body is returned as text because
    /// login endpoints do not answer with JSON.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<(HeaderMap, String), FetchError> {
        let url = self.resolve(path)?;

        let response = self
            .http
            .post(url)
            .timeout(self.timeout)
            .form(form)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_ms()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_ms()))?;

        Ok((headers, body))
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Combine a base URL with an absolute path, a relative path or a bare query.
///
/// Absolute paths are appended to the base URL's own path so services hosted
/// under a reverse-proxy prefix (`http://host/sonarr`) keep that prefix.
pub fn resolve_url(base_url: &str, path: &str) -> Result<Url, FetchError> {
    let base = Url::parse(base_url)
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;

    if path.starts_with('/') {
        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", joined, e)))
    } else {
        base.join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}{}: {}", base_url, path, e)))
    }
}
