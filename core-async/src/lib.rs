//! Runtime abstraction layer for the detection SDK.
//!
//! Every `core-*` and `bridge-*` crate goes through this crate instead of
//! depending on Tokio directly. Besides thin re-exports it owns the one piece
//! of runtime logic the SDK needs: [`runtime::DedicatedRuntime`], a lazily
//! started, client-owned executor that lets synchronous callers drive async
//! operations to completion.
//!
//! # Modules
//!
//! - `task`: Task spawning and join handles
//! - `time`: Sleep, timeouts and instants
//! - `runtime`: `block_on` and the dedicated runtime
//!
//! # Examples
//!
//! ```rust
//! use core_async::runtime::DedicatedRuntime;
//! use core_async::time::{sleep, Duration};
//!
//! let runtime = DedicatedRuntime::new("example-runtime");
//! let value = runtime
//!     .run(async {
//!         sleep(Duration::from_millis(1)).await;
//!         42
//!     })
//!     .unwrap();
//! assert_eq!(value, 42);
//! runtime.shutdown();
//! ```

// Re-export the async entry-point/test macros so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::{main, test};

pub mod runtime;
pub mod task;
pub mod time;

pub use runtime::{DedicatedRuntime, RunError};
pub use task::spawn;
pub use time::{sleep, Duration, Instant};
