//! Runtime utilities that abstract over the underlying async executor.
//!
//! [`block_on`] drives a future on a throwaway current-thread runtime and is
//! what the `#[core_async::main]` / `#[core_async::test]` macros expand to.
//!
//! [`DedicatedRuntime`] is the long-lived alternative: a single-worker Tokio
//! runtime that is created on first use, reused for every subsequent call and
//! torn down explicitly. Callers on any thread (including threads that are
//! themselves inside another async runtime) can hand it a future and block
//! until the result is ready.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion using a lightweight runtime.
pub fn block_on<F>(future: F) -> F::Output
where
    F: Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}

/// Failure to run a future on a [`DedicatedRuntime`].
#[derive(Error, Debug)]
pub enum RunError {
    /// The runtime could not be started
    #[error("failed to start runtime: {0}")]
    Build(#[from] std::io::Error),

    /// The task panicked or was cancelled by a shutdown
    #[error("task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The caller is running on the runtime's own worker thread
    #[error("cannot block on runtime '{0}' from its own worker thread")]
    Reentrant(String),
}

/// A lazily created, explicitly shut down runtime owned by one component.
///
/// Futures submitted through [`run`](Self::run) are spawned onto the runtime's
/// single worker thread in submission order; the calling thread parks until
/// its own future finishes. Once running, the submitted futures interleave
/// cooperatively at their await points.
pub struct DedicatedRuntime {
    thread_name: String,
    runtime: Mutex<Option<Runtime>>,
}

impl DedicatedRuntime {
    /// Create a handle; no threads are started until the first `run`.
    pub fn new(thread_name: impl Into<String>) -> Self {
        Self {
            thread_name: thread_name.into(),
            runtime: Mutex::new(None),
        }
    }

    /// Whether the runtime has been started and not yet shut down.
    pub fn is_active(&self) -> bool {
        self.runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether the calling thread is this runtime's worker.
    pub fn on_worker_thread(&self) -> bool {
        std::thread::current().name() == Some(self.thread_name.as_str())
    }

    /// Handle to the runtime, starting it if needed.
    pub fn handle(&self) -> Result<Handle, RunError> {
        let mut slot = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(runtime) = slot.as_ref() {
            return Ok(runtime.handle().clone());
        }

        debug!(thread = %self.thread_name, "Starting dedicated runtime");
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name(self.thread_name.clone())
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        *slot = Some(runtime);
        Ok(handle)
    }

    /// Run `future` on the runtime and block the calling thread until it completes.
    pub fn run<F>(&self, future: F) -> Result<F::Output, RunError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if self.on_worker_thread() {
            return Err(RunError::Reentrant(self.thread_name.clone()));
        }

        let handle = self.handle()?;
        let task = handle.spawn(future);
        Ok(futures::executor::block_on(task)?)
    }

    /// Stop the runtime. Safe to call repeatedly and from inside async code.
    ///
    /// Tasks still in flight are cancelled; their `run` callers receive
    /// [`RunError::Join`].
    pub fn shutdown(&self) {
        let runtime = self
            .runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(runtime) = runtime {
            debug!(thread = %self.thread_name, "Shutting down dedicated runtime");
            runtime.shutdown_background();
        }
    }
}

// A plain `Runtime` drop panics inside async code.
impl Drop for DedicatedRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for DedicatedRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedicatedRuntime")
            .field("thread_name", &self.thread_name)
            .field("active", &self.is_active())
            .finish()
    }
}
