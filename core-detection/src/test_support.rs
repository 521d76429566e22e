//! Test doubles shared by the unit tests of this crate.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::storage::{FileMetadata, FileSystemAccess};
use bytes::Bytes;
use core_runtime::config::ApiKey;
use mockall::mock;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::transport::ApiTransport;

mock! {
    pub HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        async fn close(&self) -> BridgeResult<()>;
    }
}

mock! {
    pub FileSystem {}

    #[async_trait]
    impl FileSystemAccess for FileSystem {
        async fn exists(&self, path: &Path) -> BridgeResult<bool>;
        async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata>;
        async fn read_file(&self, path: &Path) -> BridgeResult<Bytes>;
    }
}

pub const BASE_URL: &str = "https://api.example.com";

pub fn transport_with(mock: MockHttpClient) -> Arc<ApiTransport> {
    Arc::new(ApiTransport::new(
        Arc::new(mock),
        BASE_URL,
        ApiKey::new("test-key"),
        Duration::from_secs(5),
    ))
}

pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

/// Raw single-result payload as the service returns it.
pub fn media_payload(request_id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "requestId": request_id,
        "resultsSummary": {
            "status": status,
            "metadata": { "finalScore": 87 }
        },
        "models": []
    })
}
