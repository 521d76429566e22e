//! Domain value objects returned to callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status vocabulary used by the service.
pub mod status {
    pub const ANALYZING: &str = "ANALYZING";
    pub const UNKNOWN: &str = "UNKNOWN";
    pub const AUTHENTIC: &str = "AUTHENTIC";
    pub const MANIPULATED: &str = "MANIPULATED";
    /// Raw spelling of [`MANIPULATED`]; never leaves the formatter.
    pub const FAKE: &str = "FAKE";
    /// Model did not contribute to the verdict
    pub const NOT_APPLICABLE: &str = "NOT_APPLICABLE";
}

/// Outcome of submitting a file or a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub request_id: String,
    /// Absent for link submissions
    pub media_id: Option<String>,
}

/// Verdict of one contributing detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub name: String,
    pub status: String,
    pub score: Option<f64>,
}

/// Normalized result of one analysis job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub request_id: String,
    pub status: String,
    /// Final score in `0.0..=1.0`
    pub score: Option<f64>,
    pub models: Vec<ModelResult>,
}

impl DetectionResult {
    /// Result for a job that has not been analyzed yet.
    pub fn unknown(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status: status::UNKNOWN.to_string(),
            score: None,
            models: Vec::new(),
        }
    }

    /// Anything other than `ANALYZING` or `UNKNOWN`.
    pub fn is_terminal(&self) -> bool {
        self.status != status::ANALYZING && self.status != status::UNKNOWN
    }

    pub fn is_analyzing(&self) -> bool {
        self.status == status::ANALYZING
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResultList {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub current_page_items_count: u64,
    pub items: Vec<DetectionResult>,
}

/// Optional filters for the paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ListFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Query pairs for a page request of `size` items.
    ///
    /// Dates are sent as `YYYY-MM-DD`; an empty name is omitted.
    pub fn to_query(&self, size: u32) -> Vec<(String, String)> {
        let mut query = vec![("size".to_string(), size.to_string())];
        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            query.push(("name".to_string(), name.to_string()));
        }
        if let Some(date) = self.start_date {
            query.push(("startDate".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            query.push(("endDate".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        query
    }
}
