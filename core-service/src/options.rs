//! Per-call overrides. Unset fields fall back to the client's [`PollingConfig`].
//!
//! [`PollingConfig`]: core_runtime::config::PollingConfig

use core_detection::types::ListFilters;
use core_detection::DEFAULT_PAGE_SIZE;
use core_runtime::config::PollingConfig;

/// Overrides for single-result polling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultOptions {
    pub max_attempts: Option<u32>,
    pub interval_ms: Option<u64>,
}

impl ResultOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    pub(crate) fn resolve(&self, polling: &PollingConfig) -> (u32, u64) {
        (
            self.max_attempts.unwrap_or(polling.max_attempts),
            self.interval_ms.unwrap_or(polling.interval_ms),
        )
    }
}

/// Page selection, filters and retry overrides for the result listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub page_number: u32,
    pub page_size: u32,
    pub filters: ListFilters,
    pub max_attempts: Option<u32>,
    pub interval_ms: Option<u64>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
            filters: ListFilters::default(),
            max_attempts: None,
            interval_ms: None,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn filters(mut self, filters: ListFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    pub(crate) fn resolve(&self, polling: &PollingConfig) -> (u32, u64) {
        (
            self.max_attempts.unwrap_or(polling.max_attempts),
            self.interval_ms.unwrap_or(polling.interval_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_options_fall_back_to_config() {
        let polling = PollingConfig::default().with_max_attempts(4);
        assert_eq!(ResultOptions::new().resolve(&polling), (4, 2000));
        assert_eq!(
            ResultOptions::new()
                .with_max_attempts(1)
                .with_interval_ms(10)
                .resolve(&polling),
            (1, 10)
        );
    }

    #[test]
    fn test_list_options_defaults() {
        let options = ListOptions::new();
        assert_eq!(options.page_number, 0);
        assert_eq!(options.page_size, 10);
        assert_eq!(options.filters, ListFilters::default());
        assert_eq!(options.resolve(&PollingConfig::default()), (30, 2000));
    }
}
