//! Detection client
//!
//! [`DetectionClient`] is cheap to clone; clones share one transport session,
//! one event emitter and one sync bridge. Every operation exists as an
//! `async fn` and as a blocking `_sync` variant that runs on the bridge.

use bridge_traits::storage::FileSystemAccess;
use core_detection::{
    ApiTransport, DetectionEmitter, DetectionEvent, DetectionResult, DetectionResultList,
    EventName, EventPoller, PollOptions, ResultPoller, UploadResult, Uploader,
};
use core_runtime::config::ClientConfig;
use core_runtime::events::ListenerId;
use std::path::Path;
use std::sync::{Arc, Weak};
use tracing::{debug, info, instrument, warn};

use crate::bridge::SyncBridge;
use crate::error::{DetectionError, Result};
use crate::options::{ListOptions, ResultOptions};

/// Callback for a `result` event in [`DetectionClient::poll_for_results_sync`].
pub type ResultCallback = Box<dyn Fn(&DetectionResult) + Send + Sync>;

/// Callback for an `error` event in [`DetectionClient::poll_for_results_sync`].
pub type ErrorCallback = Box<dyn Fn(&DetectionError) + Send + Sync>;

struct ClientInner {
    config: ClientConfig,
    transport: Arc<ApiTransport>,
    uploader: Uploader,
    results: ResultPoller,
    events: EventPoller,
    emitter: DetectionEmitter,
    bridge: SyncBridge,
}

/// Client for the detection service.
#[derive(Clone)]
pub struct DetectionClient {
    inner: Arc<ClientInner>,
}

impl DetectionClient {
    pub fn new(config: ClientConfig) -> Self {
        let transport = Arc::new(ApiTransport::from_config(&config));
        let uploader = Uploader::new(Arc::clone(&transport), Arc::clone(&config.file_system));
        let results = ResultPoller::new(Arc::clone(&transport));
        let emitter = DetectionEmitter::new();
        let events = EventPoller::new(results.clone(), emitter.clone());

        debug!(base_url = %config.base_url, "Detection client created");
        Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                uploader,
                results,
                events,
                emitter,
                bridge: SyncBridge::new(),
            }),
        }
    }

    /// Client for the default service with the desktop capabilities.
    ///
    /// # Errors
    ///
    /// `unauthorized` "API key is required" for a blank key.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        let config = ClientConfig::builder().api_key(api_key).build()?;
        Ok(Self::new(config))
    }

    /// Client configured from `REALITY_DEFENDER_API_KEY` / `REALITY_DEFENDER_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Upload a local file and return its request id.
    #[instrument(skip(self))]
    pub async fn upload(&self, file_path: &str) -> Result<UploadResult> {
        self.inner.uploader.upload(file_path).await
    }

    pub fn upload_sync(&self, file_path: &str) -> Result<UploadResult> {
        let client = self.clone();
        let file_path = file_path.to_string();
        self.inner
            .bridge
            .run(async move { client.upload(&file_path).await })
    }

    /// Submit a social media link for analysis.
    #[instrument(skip(self))]
    pub async fn upload_link(&self, link: &str) -> Result<UploadResult> {
        core_detection::submit_link(&self.inner.transport, link).await
    }

    pub fn upload_link_sync(&self, link: &str) -> Result<UploadResult> {
        let client = self.clone();
        let link = link.to_string();
        self.inner
            .bridge
            .run(async move { client.upload_link(&link).await })
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Poll one job until it settles; see [`ResultPoller::poll_single`].
    #[instrument(skip(self))]
    pub async fn get_result(
        &self,
        request_id: &str,
        options: ResultOptions,
    ) -> Result<DetectionResult> {
        let (max_attempts, interval_ms) = options.resolve(&self.inner.config.polling);
        self.inner
            .results
            .poll_single(request_id, max_attempts, interval_ms)
            .await
    }

    pub fn get_result_sync(
        &self,
        request_id: &str,
        options: ResultOptions,
    ) -> Result<DetectionResult> {
        let client = self.clone();
        let request_id = request_id.to_string();
        self.inner
            .bridge
            .run(async move { client.get_result(&request_id, options).await })
    }

    /// Fetch one page of results; see [`ResultPoller::poll_list`].
    #[instrument(skip(self))]
    pub async fn get_results(&self, options: ListOptions) -> Result<DetectionResultList> {
        let (max_attempts, interval_ms) = options.resolve(&self.inner.config.polling);
        self.inner
            .results
            .poll_list(
                options.page_number,
                options.page_size,
                &options.filters,
                max_attempts,
                interval_ms,
            )
            .await
    }

    pub fn get_results_sync(&self, options: ListOptions) -> Result<DetectionResultList> {
        let client = self.clone();
        self.inner
            .bridge
            .run(async move { client.get_results(options).await })
    }

    /// Upload `file_path` and wait for its result with default polling.
    ///
    /// # Errors
    ///
    /// `invalid_file` "File not found: ..." before any request if the path
    /// does not exist, plus every error of upload and polling.
    pub fn detect_file(&self, file_path: &str) -> Result<DetectionResult> {
        let client = self.clone();
        let file_path = file_path.to_string();
        self.inner.bridge.run(async move {
            let file_system: &dyn FileSystemAccess = client.inner.config.file_system.as_ref();
            if !file_system.exists(Path::new(&file_path)).await.unwrap_or(false) {
                return Err(DetectionError::invalid_file(format!(
                    "File not found: {}",
                    file_path
                )));
            }

            let upload = client.upload(&file_path).await?;
            client
                .get_result(&upload.request_id, ResultOptions::default())
                .await
        })
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Long poll `request_id`, emitting one `result` or `error` event.
    ///
    /// Unset options fall back to the client's polling interval and timeout.
    /// The emitted event is returned as well.
    pub async fn poll_for_results(
        &self,
        request_id: &str,
        options: PollOptions,
    ) -> DetectionEvent {
        let polling = &self.inner.config.polling;
        let options = PollOptions {
            interval_ms: options.interval_ms.or(Some(polling.interval_ms)),
            timeout_ms: options
                .timeout_ms
                .or_else(|| Some(i64::try_from(polling.timeout_ms).unwrap_or(i64::MAX))),
        };
        self.inner.events.poll_for_results(request_id, options).await
    }

    /// Blocking long poll with optional one-off callbacks.
    ///
    /// The callbacks are registered for this call only and removed afterwards;
    /// listeners registered with [`on`](Self::on) fire as well. Callbacks run on
    /// the bridge thread and must not call other `_sync` methods.
    pub fn poll_for_results_sync(
        &self,
        request_id: &str,
        options: PollOptions,
        on_result: Option<ResultCallback>,
        on_error: Option<ErrorCallback>,
    ) -> Result<DetectionEvent> {
        let emitter = &self.inner.emitter;
        let mut registered = Vec::new();

        if let Some(callback) = on_result {
            registered.push(emitter.on(EventName::Result, move |event: &DetectionEvent| {
                if let Some(result) = event.as_result() {
                    callback(result);
                }
            }));
        }
        if let Some(callback) = on_error {
            registered.push(emitter.on(EventName::Error, move |event: &DetectionEvent| {
                if let Some(error) = event.as_error() {
                    callback(error);
                }
            }));
        }

        let client = self.clone();
        let request_id = request_id.to_string();
        let outcome = self
            .inner
            .bridge
            .run_infallible(async move { client.poll_for_results(&request_id, options).await });

        for id in registered {
            emitter.remove_listener(id);
        }
        outcome
    }

    /// Call `callback` on every `event`.
    pub fn on<F>(&self, event: EventName, callback: F) -> ListenerId
    where
        F: Fn(&DetectionEvent) + Send + Sync + 'static,
    {
        self.inner.emitter.on(event, callback)
    }

    /// Call `callback` on the next `event` only.
    pub fn once<F>(&self, event: EventName, callback: F) -> ListenerId
    where
        F: Fn(&DetectionEvent) + Send + Sync + 'static,
    {
        self.inner.emitter.once(event, callback)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.emitter.remove_listener(id)
    }

    /// Remove the listeners of one event, or of every event with `None`.
    pub fn remove_all_listeners(&self, event: Option<EventName>) {
        self.inner.emitter.remove_all_listeners(event.as_ref());
    }

    pub fn emitter(&self) -> &DetectionEmitter {
        &self.inner.emitter
    }

    // =========================================================================
    // Shutdown
    // =========================================================================

    /// Release the transport session and stop the sync bridge.
    ///
    /// Idempotent. The client stays usable: the session and the bridge are
    /// recreated on next use.
    pub async fn shutdown(&self) -> Result<()> {
        let closed = self.inner.transport.close().await;
        self.inner.bridge.shutdown();
        info!("Detection client shut down");
        closed
    }

    /// Blocking [`shutdown`](Self::shutdown).
    ///
    /// Safe to call from an event callback running on the bridge worker: the
    /// session is then closed in place instead of through the bridge.
    pub fn shutdown_sync(&self) -> Result<()> {
        let bridge = &self.inner.bridge;
        let closed = if bridge.is_active() && !bridge.on_worker() {
            let transport = Arc::clone(&self.inner.transport);
            bridge.run(async move { transport.close().await })
        } else {
            futures::executor::block_on(self.inner.transport.close())
        };
        bridge.shutdown();
        info!("Detection client shut down");
        closed
    }

    /// Hook for the host's exit mechanism.
    ///
    /// The hook holds a weak reference: once every clone of the client is
    /// dropped it does nothing. Failures are logged and swallowed.
    pub fn shutdown_hook(&self) -> impl Fn() + Send + Sync + 'static {
        let inner: Weak<ClientInner> = Arc::downgrade(&self.inner);
        move || {
            if let Some(inner) = inner.upgrade() {
                let client = DetectionClient { inner };
                if let Err(e) = client.shutdown_sync() {
                    warn!(error = %e, "Shutdown at exit failed");
                }
            }
        }
    }
}

impl std::fmt::Debug for DetectionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionClient")
            .field("config", &self.inner.config)
            .field("bridge", &self.inner.bridge)
            .finish()
    }
}
