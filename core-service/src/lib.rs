//! Detection client facade.
//!
//! Wires the host capabilities from [`ClientConfig`](core_runtime::config::ClientConfig)
//! into the detection core and exposes every operation twice: as an `async fn`
//! for callers that already run an executor, and as a blocking `_sync`
//! variant driven by a client-owned runtime.
//!
//! Desktop hosts enable the `desktop-shims` feature (on by default), which
//! supplies a reqwest transport and a tokio filesystem when the configuration
//! does not provide its own.
//!
//! ```no_run
//! use core_service::{DetectionClient, ResultOptions};
//!
//! # fn main() -> core_service::Result<()> {
//! let client = DetectionClient::with_api_key("my-key")?;
//! let upload = client.upload_sync("/tmp/clip.mp4")?;
//! let result = client.get_result_sync(&upload.request_id, ResultOptions::default())?;
//! println!("{} {:?}", result.status, result.score);
//! client.shutdown_sync()?;
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod client;
pub mod error;
pub mod options;

pub use bridge::SyncBridge;
pub use client::{DetectionClient, ErrorCallback, ResultCallback};
pub use error::{DetectionError, ErrorKind, Result};
pub use options::{ListOptions, ResultOptions};

pub use core_detection::{
    DetectionEvent, DetectionResult, DetectionResultList, EventName, ListFilters, ModelResult,
    PollOptions, UploadResult,
};
