//! Errors surfaced by [`DetectionClient`](crate::DetectionClient).
//!
//! Callers only ever see [`DetectionError`]; failures of the blocking bridge
//! itself are folded into `unknown_error`.

use core_async::RunError;

pub use core_detection::error::{DetectionError, ErrorKind};

pub type Result<T> = std::result::Result<T, DetectionError>;

pub(crate) fn bridge_failure(error: RunError) -> DetectionError {
    DetectionError::unknown(format!("Async operation failed: {}", error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_failure_is_unknown_error() {
        let error = bridge_failure(RunError::Reentrant("detection-sync-1".to_string()));
        assert_eq!(error.kind, ErrorKind::UnknownError);
        assert!(error.message.starts_with("Async operation failed:"));
        assert!(error.message.contains("detection-sync-1"));
    }
}
