//! Blocking entry points over the async client.
//!
//! Each client owns one [`SyncBridge`]. Its dedicated runtime starts on the
//! first blocking call and is reused until [`SyncBridge::shutdown`]; calls
//! from several threads queue onto it in submission order.

use core_async::DedicatedRuntime;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::error::{bridge_failure, Result};

static NEXT_BRIDGE_ID: AtomicU64 = AtomicU64::new(1);

/// Drives client futures to completion for synchronous callers.
#[derive(Debug)]
pub struct SyncBridge {
    runtime: DedicatedRuntime,
}

impl SyncBridge {
    pub fn new() -> Self {
        // One worker name per bridge so reentrancy checks never cross clients.
        let id = NEXT_BRIDGE_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            runtime: DedicatedRuntime::new(format!("detection-sync-{}", id)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.runtime.is_active()
    }

    /// Whether the caller is running on the bridge's worker, e.g. inside an
    /// event callback of a blocking poll.
    pub fn on_worker(&self) -> bool {
        self.runtime.on_worker_thread()
    }

    /// Run `future` on the bridge and block until it finishes.
    ///
    /// The operation's own error comes back unchanged. A panic, a runtime
    /// that fails to start, or a call made from the bridge's own worker
    /// thread becomes `unknown_error`.
    pub fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        self.runtime.run(future).map_err(bridge_failure)?
    }

    /// Like [`run`](Self::run) for operations that cannot fail.
    pub fn run_infallible<F>(&self, future: F) -> Result<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.run(future).map_err(bridge_failure)
    }

    /// Stop the runtime; the next blocking call starts a fresh one.
    pub fn shutdown(&self) {
        if self.runtime.is_active() {
            debug!("Stopping sync bridge");
        }
        self.runtime.shutdown();
    }
}

impl Default for SyncBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DetectionError, ErrorKind};
    use std::sync::Arc;

    #[test]
    fn test_runtime_created_on_first_call() {
        let bridge = SyncBridge::new();
        assert!(!bridge.is_active());

        let value = bridge.run(async { Ok::<_, DetectionError>(3) }).unwrap();
        assert_eq!(value, 3);
        assert!(bridge.is_active());

        bridge.shutdown();
        assert!(!bridge.is_active());
        bridge.shutdown();
    }

    #[test]
    fn test_domain_error_passes_through() {
        let bridge = SyncBridge::new();
        let error = bridge
            .run(async { Err::<(), _>(DetectionError::not_found("Resource not found")) })
            .unwrap_err();
        assert_eq!(error, DetectionError::not_found("Resource not found"));
    }

    #[test]
    fn test_panic_becomes_unknown_error() {
        let bridge = SyncBridge::new();
        let error = bridge
            .run(async {
                if true {
                    panic!("task exploded");
                }
                Ok::<(), DetectionError>(())
            })
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnknownError);
        assert!(error.message.starts_with("Async operation failed:"));

        // still usable afterwards
        assert_eq!(bridge.run_infallible(async { 1 }).unwrap(), 1);
    }

    #[test]
    fn test_bridges_have_distinct_workers() {
        let first = SyncBridge::new();
        let second = Arc::new(SyncBridge::new());

        let inner = Arc::clone(&second);
        let nested = first
            .run_infallible(async move { inner.run_infallible(async { 9 }) })
            .unwrap();
        assert_eq!(nested.unwrap(), 9);
    }

    #[test]
    fn test_reentrant_call_is_rejected() {
        let bridge = Arc::new(SyncBridge::new());
        let inner = Arc::clone(&bridge);

        let (on_worker, nested) = bridge
            .run_infallible(async move { (inner.on_worker(), inner.run_infallible(async { 0 })) })
            .unwrap();
        assert!(on_worker);
        assert_eq!(nested.unwrap_err().kind, ErrorKind::UnknownError);
        assert!(!bridge.on_worker());
    }
}
