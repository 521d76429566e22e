//! Detection SDK.
//!
//! Single entry point over the workspace crates. Host applications depend on
//! `detection-sdk` and get the client, the result types and the logging setup
//! without wiring each crate individually.
//!
//! The `desktop-shims` feature (default) supplies the reqwest transport and
//! the tokio filesystem. Without it, pass your own implementations through
//! [`ClientConfig::builder`].
//!
//! ```no_run
//! use detection_sdk::{init_logging, DetectionClient, LoggingConfig, PollOptions};
//!
//! # async fn run() -> detection_sdk::Result<()> {
//! init_logging(LoggingConfig::default()).ok();
//!
//! let client = DetectionClient::from_env()?;
//! let upload = client.upload("/tmp/photo.jpg").await?;
//! let event = client
//!     .poll_for_results(&upload.request_id, PollOptions::default())
//!     .await;
//! println!("{:?}", event.into_result()?);
//! client.shutdown().await
//! # }
//! ```

pub use core_service::{
    DetectionClient, DetectionError, DetectionEvent, DetectionResult, DetectionResultList,
    ErrorCallback, ErrorKind, EventName, ListFilters, ListOptions, ModelResult, PollOptions,
    Result, ResultCallback, ResultOptions, UploadResult,
};

pub use core_runtime::config::{ApiKey, ClientConfig, ClientConfigBuilder, PollingConfig};
pub use core_runtime::events::ListenerId;
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

pub use core_detection::media::SUPPORTED_FILE_TYPES;
