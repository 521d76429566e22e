//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpBody, HttpClient, HttpMethod, HttpRequest, HttpResponse},
};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("detection-sdk/", env!("CARGO_PKG_VERSION"));

/// Reqwest-based HTTP client implementation
///
/// The underlying `reqwest::Client` (and with it the connection pool) is
/// built on first use and dropped by [`HttpClient::close`]; a later request
/// builds a fresh one. No retries are performed here.
pub struct ReqwestHttpClient {
    timeout: Duration,
    client: RwLock<Option<Client>>,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            client: RwLock::new(None),
        }
    }

    /// Whether a session is currently open
    pub fn has_session(&self) -> bool {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn ensure_client(&self) -> Result<Client> {
        if let Some(client) = self
            .client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(client.clone());
        }

        let mut slot = self.client.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        debug!(timeout_ms = self.timeout.as_millis() as u64, "Opening HTTP session");
        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                BridgeError::OperationFailed(format!("Failed to build HTTP client: {}", e))
            })?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }

    /// Build reqwest request from bridge request
    fn build_request(client: &Client, request: HttpRequest) -> Result<reqwest::RequestBuilder> {
        let method = Self::convert_method(request.method);
        let mut req = client.request(method, &request.url);

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        match request.body {
            Some(HttpBody::Bytes(bytes)) => {
                req = req.body(bytes);
            }
            Some(HttpBody::Form(fields)) => {
                req = req
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(HttpBody::encode_form(&fields));
            }
            Some(HttpBody::Multipart { fields, file }) => {
                let mut form = reqwest::multipart::Form::new();
                for (key, value) in fields {
                    form = form.text(key, value);
                }
                if let Some(file) = file {
                    let part = reqwest::multipart::Part::bytes(file.content.to_vec())
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)
                        .map_err(|e| {
                            BridgeError::OperationFailed(format!("Invalid content type: {}", e))
                        })?;
                    form = form.part(file.field_name, part);
                }
                req = req.multipart(form);
            }
            None => {}
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        Ok(req)
    }

    fn map_send_error(e: reqwest::Error) -> BridgeError {
        if e.is_timeout() {
            BridgeError::Timeout
        } else if e.is_connect() {
            BridgeError::Connection(e.to_string())
        } else {
            BridgeError::OperationFailed(e.to_string())
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let client = self.ensure_client()?;
        let url = request.url.clone();
        debug!(method = ?request.method, url = %url, "Executing HTTP request");

        let response = Self::build_request(&client, request)?
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "HTTP request failed");
                Self::map_send_error(e)
            })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;

        debug!(status, size = body.len(), "HTTP response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn close(&self) -> Result<()> {
        let closed = self
            .client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if closed.is_some() {
            debug!("Closed HTTP session");
        }
        Ok(())
    }
}
