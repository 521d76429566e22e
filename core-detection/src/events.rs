//! Event vocabulary for the event-driven poller.

use core_runtime::events::EventEmitter;
use std::fmt;
use std::str::FromStr;

use crate::error::DetectionError;
use crate::types::DetectionResult;

/// The two event categories a poll can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    Result,
    Error,
}

impl EventName {
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::Result => "result",
            EventName::Error => "error",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = DetectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "result" => Ok(EventName::Result),
            "error" => Ok(EventName::Error),
            other => Err(DetectionError::invalid_request(format!(
                "Unknown event name: {}",
                other
            ))),
        }
    }
}

/// Terminal outcome of a poll.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionEvent {
    Result(DetectionResult),
    Error(DetectionError),
}

impl DetectionEvent {
    pub fn name(&self) -> EventName {
        match self {
            DetectionEvent::Result(_) => EventName::Result,
            DetectionEvent::Error(_) => EventName::Error,
        }
    }

    pub fn as_result(&self) -> Option<&DetectionResult> {
        match self {
            DetectionEvent::Result(result) => Some(result),
            DetectionEvent::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&DetectionError> {
        match self {
            DetectionEvent::Error(error) => Some(error),
            DetectionEvent::Result(_) => None,
        }
    }

    pub fn into_result(self) -> Result<DetectionResult, DetectionError> {
        match self {
            DetectionEvent::Result(result) => Ok(result),
            DetectionEvent::Error(error) => Err(error),
        }
    }
}

/// Emitter shared by a client and its pollers.
pub type DetectionEmitter = EventEmitter<EventName, DetectionEvent>;
