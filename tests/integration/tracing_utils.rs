//! Utilities for capturing and verifying tracing output in integration tests.
//!
//! When tests spawn the binary with `JIRA_REPORT_TRACE_FILE` set, trace events are
//! written in JSON format to that file. These utilities help parse and verify those traces.

use std::{fs, path::Path};

use serde::Deserialize;

/// A single trace event from the JSON log
#[derive(Debug, Deserialize)]
pub struct TraceEvent {
	pub fields: TraceFields,
}

#[derive(Debug, Deserialize)]
pub struct TraceFields {
	pub message: Option<String>,
	/// Search expression, on "searching issues" events
	pub jql: Option<String>,
	pub error: Option<String>,
	/// Report title, on "report written" events
	pub report: Option<String>,
}

/// Parsed trace log that provides verification methods
pub struct TraceLog {
	events: Vec<TraceEvent>,
}

impl TraceLog {
	/// Read and parse a trace log file
	pub fn from_file(path: &Path) -> Self {
		let content = fs::read_to_string(path).unwrap_or_default();
		let events: Vec<TraceEvent> = content.lines().filter(|line| !line.is_empty()).filter_map(|line| serde_json::from_str(line).ok()).collect();

		Self { events }
	}

	pub fn with_message(&self, message: &str) -> Vec<&TraceEvent> {
		self.events.iter().filter(|e| e.fields.message.as_deref() == Some(message)).collect()
	}

	pub fn searches(&self) -> Vec<&str> {
		self.events.iter().filter_map(|e| e.fields.jql.as_deref()).collect()
	}

	pub fn messages(&self) -> Vec<&str> {
		self.events.iter().filter_map(|e| e.fields.message.as_deref()).collect()
	}
}

/// Assert that an event with the given message was traced
#[macro_export]
macro_rules! assert_traced {
	($log:expr, $message:expr) => {
		assert!(
			!$log.with_message($message).is_empty(),
			"Expected '{}' to be traced, but it wasn't. Messages:\n{:#?}",
			$message,
			$log.messages()
		);
	};
}
