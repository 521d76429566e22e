//! Time-related abstractions.
//!
//! Polling loops sleep through [`sleep`] so the suspension point is always a
//! Tokio timer and never a blocking thread sleep.

pub use tokio::time::{sleep, timeout};

pub use std::time::{Duration, Instant};

/// Sleeps for the given number of milliseconds.
///
/// A zero value still yields to the scheduler once.
pub async fn sleep_ms(millis: u64) {
    sleep(Duration::from_millis(millis)).await
}
