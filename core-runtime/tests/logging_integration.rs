//! Integration tests for the logging and event infrastructure

use bridge_traits::time::{LogEntry, LogLevel, LoggerSink};
use core_runtime::events::EventEmitter;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_runtime::Error;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl LoggerSink for CollectingSink {
    fn log(&self, entry: LogEntry) -> bridge_traits::error::Result<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

// The global subscriber can only be installed once per process, so every
// assertion about it lives in this single test.
#[test]
fn test_global_logging_lifecycle() {
    let sink = Arc::new(CollectingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(sink.clone());

    init_logging(config).unwrap();

    tracing::debug!(target: "core_detection::transport", api_key = "key-123", path = "/api/files/social", "POST");
    tracing::debug!(target: "some_dependency", "filtered out");

    {
        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "POST");
        assert_eq!(
            entries[0].fields.get("api_key").map(String::as_str),
            Some("[REDACTED]")
        );
        assert_eq!(
            entries[0].fields.get("path").map(String::as_str),
            Some("/api/files/social")
        );
    }

    let second = init_logging(LoggingConfig::default());
    assert!(matches!(second, Err(Error::Config(_))));
}

#[test]
fn test_invalid_filter_is_rejected() {
    let config = LoggingConfig::default().with_filter("core_detection=notalevel");
    assert!(matches!(init_logging(config), Err(Error::Config(_))));
}

#[test]
fn test_emitter_shared_across_threads() {
    let emitter: EventEmitter<String, u64> = EventEmitter::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    emitter.on("tick".to_string(), move |value| {
        sink.lock().unwrap().push(*value);
    });

    let producer = emitter.clone();
    std::thread::spawn(move || {
        for value in 0..3 {
            producer.emit(&"tick".to_string(), &value);
        }
    })
    .join()
    .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
}
