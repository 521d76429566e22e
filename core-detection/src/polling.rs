//! Attempt-budgeted polling
//!
//! Single-result polling degrades to the best known state when the budget
//! runs out; list polling raises `timeout` instead.

use core_async::time::sleep_ms;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::{DetectionError, ErrorKind, Result};
use crate::formatter::{format_result, format_result_list};
use crate::transport::{paths, ApiTransport};
use crate::types::{DetectionResult, DetectionResultList, ListFilters};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Fetches and polls job results through one transport.
#[derive(Clone)]
pub struct ResultPoller {
    transport: Arc<ApiTransport>,
}

impl ResultPoller {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    /// Fetch and format the current state of one job.
    pub async fn fetch_result(&self, request_id: &str) -> Result<DetectionResult> {
        let path = format!(
            "{}/{}",
            paths::MEDIA_RESULT,
            urlencoding::encode(request_id)
        );
        let raw = self.transport.get(&path, Vec::new()).await?;
        format_result(&raw)
    }

    /// Fetch and format one page of results.
    pub async fn fetch_results(
        &self,
        page_number: u32,
        page_size: u32,
        filters: &ListFilters,
    ) -> Result<DetectionResultList> {
        let path = format!("{}/{}", paths::ALL_MEDIA_RESULTS, page_number);
        let raw = self.transport.get(&path, filters.to_query(page_size)).await?;
        format_result_list(&raw)
    }

    /// Poll one job until it reaches a terminal status.
    ///
    /// Returns the last fetched result when `max_attempts` is used up, even
    /// if it is still `ANALYZING`. `not_found` is retried while attempts
    /// remain; any other error is returned at once.
    #[instrument(skip(self))]
    pub async fn poll_single(
        &self,
        request_id: &str,
        max_attempts: u32,
        interval_ms: u64,
    ) -> Result<DetectionResult> {
        if request_id.is_empty() {
            return Err(DetectionError::not_found("request_id is required"));
        }

        let max_attempts = max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let last_attempt = attempt >= max_attempts;

            match self.fetch_result(request_id).await {
                Ok(result) if result.is_terminal() || last_attempt => {
                    debug!(attempt, status = %result.status, "Polling finished");
                    return Ok(result);
                }
                Ok(result) => {
                    debug!(attempt, max_attempts, status = %result.status, "Job not finished");
                }
                Err(e) if e.is(ErrorKind::NotFound) && !last_attempt => {
                    debug!(attempt, max_attempts, "Job not indexed yet");
                }
                Err(e) => return Err(e),
            }

            sleep_ms(interval_ms).await;
        }
    }

    /// Fetch one page, retrying failures other than `unauthorized`.
    ///
    /// # Errors
    ///
    /// `timeout` once `max_attempts` fetches have failed.
    #[instrument(skip(self, filters))]
    pub async fn poll_list(
        &self,
        page_number: u32,
        page_size: u32,
        filters: &ListFilters,
        max_attempts: u32,
        interval_ms: u64,
    ) -> Result<DetectionResultList> {
        let max_attempts = max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.fetch_results(page_number, page_size, filters).await {
                Ok(list) => return Ok(list),
                Err(e) if e.is(ErrorKind::Unauthorized) => return Err(e),
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "Result list fetch failed");
                    last_error = Some(e);
                }
            }

            if attempt < max_attempts {
                sleep_ms(interval_ms).await;
            }
        }

        let detail = last_error
            .map(|e| format!(": {}", e.message))
            .unwrap_or_default();
        Err(DetectionError::timeout(format!(
            "Failed to get detection result list after {} attempts{}",
            max_attempts, detail
        )))
    }
}
