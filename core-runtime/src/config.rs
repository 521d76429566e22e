//! # Client Configuration
//!
//! Builder-based configuration for a detection client.
//!
//! ## Overview
//!
//! [`ClientConfig`] bundles the API credentials, the service base URL, the
//! host bridges used for HTTP and file access, and the polling defaults. It is
//! built through [`ClientConfigBuilder`], which validates eagerly: a missing API
//! key, an unparseable base URL or a missing bridge are reported at build time
//! rather than on the first request.
//!
//! ## Bridges
//!
//! - `HttpClient` - required (desktop default: reqwest)
//! - `FileSystemAccess` - required (desktop default: tokio fs)
//!
//! When the `desktop-shims` feature is enabled, desktop implementations are
//! injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{ClientConfig, PollingConfig};
//!
//! let config = ClientConfig::builder()
//!     .api_key("my-api-key")
//!     .polling(PollingConfig::default().with_interval_ms(500))
//!     .build()?;
//! ```
//!
//! ## Environment
//!
//! [`ClientConfig::from_env`] reads `REALITY_DEFENDER_API_KEY` (falling back to
//! `RD_API_KEY`) and the optional `REALITY_DEFENDER_BASE_URL`.

use crate::error::{Error, Result};
use bridge_traits::{FileSystemAccess, HttpClient};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Production endpoint of the detection service.
pub const DEFAULT_BASE_URL: &str = "https://api.prd.realitydefender.xyz";

pub const API_KEY_ENV: &str = "REALITY_DEFENDER_API_KEY";
pub const API_KEY_ENV_FALLBACK: &str = "RD_API_KEY";
pub const BASE_URL_ENV: &str = "REALITY_DEFENDER_BASE_URL";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API key wrapper that never prints its value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the request header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Defaults applied by the polling operations when a call does not override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Fetch budget for single-result and list polling
    pub max_attempts: u32,
    /// Pause between fetches
    pub interval_ms: u64,
    /// Time budget for the event-driven poller
    pub timeout_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval_ms: 2000,
            timeout_ms: 60_000,
        }
    }
}

impl PollingConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Validated configuration for one detection client.
///
/// Use [`ClientConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct ClientConfig {
    /// Credential sent as `X-API-KEY`
    pub api_key: ApiKey,

    /// Service root without a trailing slash
    pub base_url: String,

    /// Transport used for every API call and for the signed-URL upload
    pub http_client: Arc<dyn HttpClient>,

    /// Local file access used before uploads
    pub file_system: Arc<dyn FileSystemAccess>,

    /// Per-request timeout handed to the transport
    pub request_timeout: Duration,

    pub polling: PollingConfig,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("http_client", &"HttpClient { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .field("request_timeout", &self.request_timeout)
            .field("polling", &self.polling)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] when neither key variable is set, plus
    /// any error [`ClientConfigBuilder::build`] can return.
    pub fn from_env() -> Result<Self> {
        ClientConfigBuilder::from_lookup(|name| std::env::var(name).ok()).build()
    }

    /// Full URL for an API path such as `/api/files/social`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
    request_timeout: Option<Duration>,
    polling: Option<PollingConfig>,
}

impl ClientConfigBuilder {
    /// Seeds a builder from environment-style lookups.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            api_key: non_empty(API_KEY_ENV).or_else(|| non_empty(API_KEY_ENV_FALLBACK)),
            base_url: non_empty(BASE_URL_ENV),
            ..Self::default()
        }
    }

    /// Sets the API key (required).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the service base URL.
    ///
    /// Default: `https://api.prd.realitydefender.xyz`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system implementation.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Per-request timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Polling defaults used when a call does not override them.
    pub fn polling(mut self, polling: PollingConfig) -> Self {
        self.polling = Some(polling);
        self
    }

    /// Builds the final `ClientConfig`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingApiKey`] if no non-blank key was provided
    /// - [`Error::InvalidBaseUrl`] if the base URL is not an absolute http(s) URL
    /// - [`Error::CapabilityMissing`] if a bridge is missing and no default exists
    pub fn build(self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .map(ApiKey::new)
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey)?;

        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => provide_default_file_system()?,
        };

        Ok(ClientConfig {
            api_key,
            base_url,
            http_client,
            file_system,
            request_timeout,
            polling: self.polling.unwrap_or_default(),
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: &str| Error::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }

    Ok(trimmed.to_string())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Ok(Arc::new(bridge_desktop::ReqwestHttpClient::with_timeout(
        timeout,
    )))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HttpClient implementation provided. \
                  Enable the `desktop-shims` feature or call .http_client()."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Ok(Arc::new(bridge_desktop::TokioFileSystem))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(Error::CapabilityMissing {
        capability: "FileSystemAccess".to_string(),
        message: "No FileSystemAccess implementation provided. \
                  Enable the `desktop-shims` feature or call .file_system()."
            .to_string(),
    })
}
