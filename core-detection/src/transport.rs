//! API transport
//!
//! Wraps a host [`HttpClient`] with the service's base URL, credentials and
//! the status-to-error mapping every API call goes through.
//!
//! The underlying session is owned by the `HttpClient` implementation: it is
//! opened lazily on the first request, shared by every concurrent operation
//! of a client and released by [`ApiTransport::close`].

use bridge_traits::http::{FilePart, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_runtime::config::{ApiKey, ClientConfig};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{DetectionError, Result};

/// Service endpoints, relative to the base URL.
pub mod paths {
    pub const SIGNED_URL: &str = "/api/files/aws-presigned";
    pub const MEDIA_RESULT: &str = "/api/media/users";
    pub const ALL_MEDIA_RESULTS: &str = "/api/v2/media/users/pages";
    pub const SOCIAL_MEDIA: &str = "/api/files/social";
}

const API_KEY_HEADER: &str = "X-API-KEY";

/// Error codes on a 400 response that mean the account, not the request, is at fault.
const ACCOUNT_BLOCKED_CODES: &[&str] = &["free-tier-not-allowed", "upload-limit-reached"];

/// Authenticated JSON transport for the detection API.
pub struct ApiTransport {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    api_key: ApiKey,
    timeout: Duration,
}

impl ApiTransport {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Arc::clone(&config.http_client),
            config.base_url.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, self.api_key.expose())
            .header("Accept", "application/json")
            .timeout(self.timeout)
    }

    /// GET `path` with query pairs and decode the JSON body.
    #[instrument(skip(self, query))]
    pub async fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<Value> {
        let mut request = self.api_request(HttpMethod::Get, path);
        request.query = query;
        self.send(request).await
    }

    /// POST form fields to `path`, as multipart when a file is attached.
    #[instrument(skip(self, fields, file))]
    pub async fn post(
        &self,
        path: &str,
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    ) -> Result<Value> {
        let request = self.api_request(HttpMethod::Post, path);
        let request = match file {
            Some(file) => request.multipart(fields, Some(file)),
            None => request.form(fields),
        };
        self.send(request).await
    }

    /// PUT raw bytes to an absolute, pre-authorized URL.
    ///
    /// The credential header is not attached and the status is not
    /// interpreted; callers decide what a failure means.
    #[instrument(skip(self, url, body), fields(size = body.len()))]
    pub async fn put(
        &self,
        url: &str,
        body: Bytes,
        content_type: &str,
    ) -> bridge_traits::error::Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Put, url)
            .header("Content-Type", content_type)
            .body(body)
            .timeout(self.timeout);
        self.http_client.execute(request).await
    }

    /// Release the underlying session. The transport reopens it on next use.
    pub async fn close(&self) -> Result<()> {
        self.http_client.close().await?;
        Ok(())
    }

    async fn send(&self, request: HttpRequest) -> Result<Value> {
        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(error = %e, "Transport failure before any response");
            DetectionError::from(e)
        })?;
        debug!(status = response.status, "API response");
        handle_response(&response)
    }
}

/// Map an API response to its JSON body or a domain error.
///
/// | status | kind |
/// |---|---|
/// | 400 with an account-blocked `code` | `unauthorized` |
/// | 400 otherwise | `invalid_request` |
/// | 401 | `unauthorized` |
/// | 404 | `not_found` |
/// | any other status above 400 | `server_error` |
/// | body is not JSON | `server_error` |
pub fn handle_response(response: &HttpResponse) -> Result<Value> {
    let parsed: Option<Value> = serde_json::from_slice(&response.body).ok();

    let (code, detail) = match parsed.as_ref().and_then(Value::as_object) {
        Some(body) => (
            body.get("code").and_then(Value::as_str).unwrap_or_default(),
            response_detail(body.get("response")),
        ),
        None => ("", response.text_lossy()),
    };

    match response.status {
        400 if ACCOUNT_BLOCKED_CODES.contains(&code) => Err(DetectionError::unauthorized(detail)),
        400 => Err(DetectionError::invalid_request(format!(
            "Invalid request: {}",
            detail
        ))),
        401 => Err(DetectionError::unauthorized("Invalid API key")),
        404 => Err(DetectionError::not_found("Resource not found")),
        status if status > 400 => Err(DetectionError::server_error(format!(
            "API error: {}",
            detail
        ))),
        _ => parsed.ok_or_else(|| {
            DetectionError::server_error(format!("Invalid JSON response: {}", detail))
        }),
    }
}

fn response_detail(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "Unknown error".to_string(),
        Some(Value::String(text)) if text.is_empty() => "Unknown error".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::MockHttpClient;
    use bridge_traits::error::BridgeError;

    fn transport(mock: MockHttpClient) -> ApiTransport {
        ApiTransport::new(
            Arc::new(mock),
            "https://api.example.com/",
            ApiKey::new("test-key"),
            Duration::from_secs(5),
        )
    }

    fn kind_for(status: u16, body: &str) -> Option<ErrorKind> {
        handle_response(&HttpResponse::new(status, body.to_string()))
            .err()
            .map(|e| e.kind)
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            kind_for(400, r#"{"code":"free-tier-not-allowed","response":"Upgrade"}"#),
            Some(ErrorKind::Unauthorized)
        );
        assert_eq!(
            kind_for(400, r#"{"code":"upload-limit-reached","response":"Limit"}"#),
            Some(ErrorKind::Unauthorized)
        );
        assert_eq!(
            kind_for(400, r#"{"code":"bad-input","response":"Nope"}"#),
            Some(ErrorKind::InvalidRequest)
        );
        assert_eq!(kind_for(400, "plain text"), Some(ErrorKind::InvalidRequest));
        assert_eq!(kind_for(401, "{}"), Some(ErrorKind::Unauthorized));
        assert_eq!(kind_for(404, "{}"), Some(ErrorKind::NotFound));
        assert_eq!(kind_for(403, "{}"), Some(ErrorKind::ServerError));
        assert_eq!(kind_for(500, "oops"), Some(ErrorKind::ServerError));
        assert_eq!(kind_for(503, "{}"), Some(ErrorKind::ServerError));
        assert_eq!(kind_for(200, "<html>"), Some(ErrorKind::ServerError));
        assert_eq!(kind_for(200, r#"{"ok":true}"#), None);
    }

    #[test]
    fn test_error_messages() {
        let error = handle_response(&HttpResponse::new(
            400,
            r#"{"code":"upload-limit-reached","response":"Monthly limit reached"}"#,
        ))
        .unwrap_err();
        assert_eq!(error.message, "Monthly limit reached");

        let error = handle_response(&HttpResponse::new(400, r#"{"response":"bad name"}"#))
            .unwrap_err();
        assert_eq!(error.message, "Invalid request: bad name");

        let error = handle_response(&HttpResponse::new(400, "{}")).unwrap_err();
        assert_eq!(error.message, "Invalid request: Unknown error");

        let error = handle_response(&HttpResponse::new(401, "{}")).unwrap_err();
        assert_eq!(error.message, "Invalid API key");

        let error = handle_response(&HttpResponse::new(404, "")).unwrap_err();
        assert_eq!(error.message, "Resource not found");

        let error = handle_response(&HttpResponse::new(502, "Bad Gateway")).unwrap_err();
        assert_eq!(error.message, "API error: Bad Gateway");

        let error = handle_response(&HttpResponse::new(200, "not json")).unwrap_err();
        assert_eq!(error.message, "Invalid JSON response: not json");
    }

    #[test]
    fn test_success_body_returned_unchanged() {
        let body = handle_response(&HttpResponse::new(
            201,
            r#"{"requestId":"r1","nested":{"a":[1,2]}}"#,
        ))
        .unwrap();
        assert_eq!(body["requestId"], "r1");
        assert_eq!(body["nested"]["a"][1], 2);
    }

    #[tokio::test]
    async fn test_get_sends_credentials_and_query() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|request: &HttpRequest| {
                request.method == HttpMethod::Get
                    && request.url == "https://api.example.com/api/media/users/abc"
                    && request.headers.get("X-API-KEY").map(String::as_str) == Some("test-key")
                    && request.headers.get("Accept").map(String::as_str)
                        == Some("application/json")
                    && request.query == vec![("size".to_string(), "10".to_string())]
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"requestId":"abc"}"#)));

        let transport = transport(mock);
        let body = transport
            .get(
                "/api/media/users/abc",
                vec![("size".to_string(), "10".to_string())],
            )
            .await
            .unwrap();
        assert_eq!(body["requestId"], "abc");
    }

    #[tokio::test]
    async fn test_post_form_without_file() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|request: &HttpRequest| {
                request.method == HttpMethod::Post
                    && request.url.ends_with(paths::SOCIAL_MEDIA)
                    && request
                        .body
                        .as_ref()
                        .and_then(|body| body.field("socialLink"))
                        == Some("https://youtube.com/watch?v=1")
                    && matches!(request.body, Some(bridge_traits::HttpBody::Form(_)))
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"requestId":"r"}"#)));

        let transport = transport(mock);
        transport
            .post(
                paths::SOCIAL_MEDIA,
                vec![(
                    "socialLink".to_string(),
                    "https://youtube.com/watch?v=1".to_string(),
                )],
                None,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_transport_failure_is_server_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::Connection("connection refused".to_string())));

        let error = transport(mock)
            .get("/api/media/users/x", Vec::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::ServerError);
        assert!(error.message.starts_with("HTTP request failed:"));
        assert!(error.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_put_skips_credentials() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|request: &HttpRequest| {
                request.method == HttpMethod::Put
                    && request.url == "https://bucket.example.com/signed"
                    && !request.headers.contains_key("X-API-KEY")
                    && request.headers.get("Content-Type").map(String::as_str)
                        == Some("video/mp4")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "")));

        let response = transport(mock)
            .put(
                "https://bucket.example.com/signed",
                Bytes::from_static(b"data"),
                "video/mp4",
            )
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_close_delegates_to_client() {
        let mut mock = MockHttpClient::new();
        mock.expect_close().times(1).returning(|| Ok(()));
        transport(mock).close().await.unwrap();
    }
}
