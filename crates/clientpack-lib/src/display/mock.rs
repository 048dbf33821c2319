//! Mock display provider implementation for testing
//!
//! Records every display call so tests can assert on user-facing output.

use super::providers::*;
use std::sync::{Arc, Mutex};

/// Mock implementation of DisplayProvider that records all calls
#[derive(Clone, Default)]
pub struct MockDisplayProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl MockDisplayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded display calls for testing assertions
    pub fn get_calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Clear all recorded calls
    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    /// Check if a specific call was made
    pub fn has_call(&self, expected: &DisplayCall) -> bool {
        self.get_calls().contains(expected)
    }

    /// Get count of calls of a specific type
    pub fn count_calls(&self, call_type: &str) -> usize {
        self.get_calls()
            .iter()
            .filter(|call| call.call_type() == call_type)
            .count()
    }
}

impl DisplayProvider for MockDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider> {
        Box::new(MockRecorder {
            calls: self.calls.clone(),
        })
    }

    fn progress(&self) -> Box<dyn ProgressProvider> {
        Box::new(MockRecorder {
            calls: self.calls.clone(),
        })
    }
}

/// Recorded display calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    StatusSuccess { item: String, details: String },
    StatusError { item: String, details: String },
    StatusWarning { message: String },
    StatusInfo { message: String },
    StatusMessage { text: String },
    StatusList { items: Vec<String> },
    ProgressSpinner { message: String },
    ProgressSetMessage { message: String },
    ProgressFinish { message: String },
    ProgressAbandon { message: String },
    ProgressFinishClear,
}

impl DisplayCall {
    pub fn call_type(&self) -> &'static str {
        match self {
            DisplayCall::StatusSuccess { .. } => "status_success",
            DisplayCall::StatusError { .. } => "status_error",
            DisplayCall::StatusWarning { .. } => "status_warning",
            DisplayCall::StatusInfo { .. } => "status_info",
            DisplayCall::StatusMessage { .. } => "status_message",
            DisplayCall::StatusList { .. } => "status_list",
            DisplayCall::ProgressSpinner { .. } => "progress_spinner",
            DisplayCall::ProgressSetMessage { .. } => "progress_set_message",
            DisplayCall::ProgressFinish { .. } => "progress_finish",
            DisplayCall::ProgressAbandon { .. } => "progress_abandon",
            DisplayCall::ProgressFinishClear => "progress_finish_clear",
        }
    }
}

/// Shared recorder used for status, progress and tracker calls
struct MockRecorder {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl MockRecorder {
    fn record_call(&self, call: DisplayCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl StatusProvider for MockRecorder {
    fn success(&self, item: &str, details: &str) {
        self.record_call(DisplayCall::StatusSuccess {
            item: item.to_string(),
            details: details.to_string(),
        });
    }

    fn error(&self, item: &str, details: &str) {
        self.record_call(DisplayCall::StatusError {
            item: item.to_string(),
            details: details.to_string(),
        });
    }

    fn warning(&self, message: &str) {
        self.record_call(DisplayCall::StatusWarning {
            message: message.to_string(),
        });
    }

    fn info(&self, message: &str) {
        self.record_call(DisplayCall::StatusInfo {
            message: message.to_string(),
        });
    }

    fn message(&self, text: &str) {
        self.record_call(DisplayCall::StatusMessage {
            text: text.to_string(),
        });
    }

    fn list(&self, items: &[&str]) {
        self.record_call(DisplayCall::StatusList {
            items: items.iter().map(|s| s.to_string()).collect(),
        });
    }
}

impl ProgressProvider for MockRecorder {
    fn spinner(&self, message: &str) -> Box<dyn ProgressTracker> {
        self.record_call(DisplayCall::ProgressSpinner {
            message: message.to_string(),
        });
        Box::new(MockRecorder {
            calls: self.calls.clone(),
        })
    }
}

impl ProgressTracker for MockRecorder {
    fn set_message(&self, message: &str) {
        self.record_call(DisplayCall::ProgressSetMessage {
            message: message.to_string(),
        });
    }

    fn finish(&self, message: &str) {
        self.record_call(DisplayCall::ProgressFinish {
            message: message.to_string(),
        });
    }

    fn abandon(&self, message: &str) {
        self.record_call(DisplayCall::ProgressAbandon {
            message: message.to_string(),
        });
    }

    fn finish_clear(&self) {
        self.record_call(DisplayCall::ProgressFinishClear);
    }
}
