//! # Detection Core
//!
//! Job lifecycle for the remote media detection service.
//!
//! ## Overview
//!
//! A job starts with an upload (file or social media link) that yields a
//! request id. Results are then retrieved either by attempt-budgeted polling
//! ([`ResultPoller`]) or by a time-budgeted long poll that reports through
//! events ([`EventPoller`]).
//!
//! ```text
//! Uploader / submit_link ──► request id ──► ResultPoller / EventPoller
//!                                                  │
//!                                   ApiTransport ◄─┘──► formatter ──► DetectionResult
//! ```
//!
//! ## Errors
//!
//! Every fallible operation returns [`DetectionError`], whose
//! [`ErrorKind`] drives the retry decisions of the pollers.

pub mod error;
pub mod events;
pub mod formatter;
pub mod media;
pub mod poller;
pub mod polling;
pub mod social;
pub mod transport;
pub mod types;
pub mod upload;

#[cfg(test)]
mod test_support;

pub use error::{DetectionError, ErrorKind, Result};
pub use events::{DetectionEmitter, DetectionEvent, EventName};
pub use formatter::{format_result, format_result_list};
pub use media::{inspect, MediaFile, SUPPORTED_FILE_TYPES};
pub use poller::{EventPoller, PollOptions};
pub use polling::{
    ResultPoller, DEFAULT_MAX_ATTEMPTS, DEFAULT_PAGE_SIZE, DEFAULT_POLLING_INTERVAL_MS,
};
pub use social::{submit_link, validate_link};
pub use transport::{handle_response, ApiTransport};
pub use types::{DetectionResult, DetectionResultList, ListFilters, ModelResult, UploadResult};
pub use upload::{SignedUpload, Uploader};
