//! # Host Bridge Traits
//!
//! Capabilities the detection core needs from its host, expressed as traits so
//! the core never touches a concrete HTTP stack or filesystem.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async GET/POST/PUT transport
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Reading local media before upload
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! Desktop implementations live in `bridge-desktop`. Tests substitute
//! `mockall` doubles.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). A bridge error
//! means no protocol-level answer was obtained (connection refused, DNS
//! failure, unreadable file); HTTP error statuses are *not* bridge errors.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so one instance can serve several
//! concurrently running polling tasks.

pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

pub use http::{FilePart, HttpBody, HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::{FileMetadata, FileSystemAccess};
pub use time::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
