//! # Core Runtime Module
//!
//! Ambient infrastructure shared by the detection SDK crates:
//! - Client configuration with builder validation and environment loading
//! - An observer-style event emitter
//! - Logging and tracing setup
//!
//! ## Overview
//!
//! Nothing in this crate talks to the detection service. It establishes the
//! configuration, logging conventions and event dispatch that `core-detection`
//! and `core-service` build on.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{ApiKey, ClientConfig, ClientConfigBuilder, PollingConfig};
pub use error::{Error, Result};
pub use events::{EventEmitter, ListenerId};
