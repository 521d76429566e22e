//! Time-budgeted long poll
//!
//! [`EventPoller::poll_for_results`] emits exactly one event on the shared
//! emitter: `result` for the first status other than `ANALYZING`, or `error`.
//! Waiting is accounted in whole intervals, so the budget counts slept time
//! and not request latency.

use core_async::time::sleep_ms;
use tracing::{debug, info, instrument};

use crate::error::{DetectionError, ErrorKind};
use crate::events::{DetectionEmitter, DetectionEvent};
use crate::polling::{ResultPoller, DEFAULT_POLLING_INTERVAL_MS};

pub const DEFAULT_TIMEOUT_MS: i64 = 60_000;

/// Interval and budget for one long poll.
///
/// A missing or zero interval uses the default. A missing timeout uses the
/// default; zero or a negative value times out before any request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOptions {
    pub interval_ms: Option<u64>,
    pub timeout_ms: Option<i64>,
}

impl PollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn interval(&self) -> u64 {
        self.interval_ms
            .filter(|&interval| interval > 0)
            .unwrap_or(DEFAULT_POLLING_INTERVAL_MS)
    }

    pub fn timeout(&self) -> i64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }
}

/// Long poller that reports through a [`DetectionEmitter`].
#[derive(Clone)]
pub struct EventPoller {
    results: ResultPoller,
    emitter: DetectionEmitter,
}

impl EventPoller {
    pub fn new(results: ResultPoller, emitter: DetectionEmitter) -> Self {
        Self { results, emitter }
    }

    pub fn emitter(&self) -> &DetectionEmitter {
        &self.emitter
    }

    /// Poll `request_id` until it settles or the budget is spent.
    ///
    /// The emitted event is also returned so callers that did not register
    /// listeners can still observe the outcome.
    #[instrument(skip(self))]
    pub async fn poll_for_results(
        &self,
        request_id: &str,
        options: PollOptions,
    ) -> DetectionEvent {
        let event = self.run(request_id, options).await;
        debug!(event = %event.name(), "Long poll finished");
        self.emitter.emit(&event.name(), &event);
        event
    }

    async fn run(&self, request_id: &str, options: PollOptions) -> DetectionEvent {
        let interval = options.interval();
        let budget = options.timeout();

        if budget <= 0 {
            return timeout_event();
        }
        if request_id.is_empty() {
            return DetectionEvent::Error(DetectionError::not_found("request_id is required"));
        }

        let budget = budget.unsigned_abs();
        let mut elapsed: u64 = 0;
        while elapsed < budget {
            match self.results.fetch_result(request_id).await {
                Ok(result) if result.is_analyzing() => {
                    debug!(elapsed_ms = elapsed, "Still analyzing");
                }
                Ok(result) => {
                    info!(status = %result.status, "Result ready");
                    return DetectionEvent::Result(result);
                }
                Err(e) if e.is(ErrorKind::NotFound) => {
                    debug!(elapsed_ms = elapsed, "Job not indexed yet");
                }
                Err(e) => return DetectionEvent::Error(e),
            }

            elapsed = elapsed.saturating_add(interval);
            sleep_ms(interval).await;
        }

        timeout_event()
    }
}

fn timeout_event() -> DetectionEvent {
    DetectionEvent::Error(DetectionError::timeout("Polling timeout exceeded"))
}
