//! Shared test infrastructure for integration tests.
//!
//! Provides `TestContext`: a scratch directory plus a way to run the compiled binary against it
//! with a fully controlled environment (no `JIRA_*` or proxy variables leak in from the host).

use std::{
	path::{Path, PathBuf},
	process::{Command, Output},
};

use tempfile::TempDir;

use crate::tracing_utils::TraceLog;

/// A port nothing listens on, so every search fails fast with "connection refused".
pub const UNREACHABLE_TRACKER: &str = "http://127.0.0.1:9";

pub struct TestContext {
	dir: TempDir,
	env: Vec<(String, String)>,
}

impl TestContext {
	pub fn new() -> Self {
		Self {
			dir: tempfile::tempdir().unwrap(),
			env: Vec::new(),
		}
	}

	/// All four required values, pointing at [UNREACHABLE_TRACKER].
	pub fn with_unreachable_tracker() -> Self {
		Self::new()
			.env("JIRA_BASE_URL", UNREACHABLE_TRACKER)
			.env("JIRA_USERNAME", "pm@acme.io")
			.env("JIRA_API_TOKEN", "token")
			.env("JIRA_PROJECT_KEY", "ACME")
	}

	pub fn env(mut self, key: &str, value: &str) -> Self {
		self.env.push((key.to_string(), value.to_string()));
		self
	}

	pub fn path(&self) -> &Path {
		self.dir.path()
	}

	pub fn out_dir(&self) -> PathBuf {
		self.dir.path().join("reports")
	}

	pub fn trace_file(&self) -> PathBuf {
		self.dir.path().join("trace.jsonl")
	}

	pub fn write(&self, name: &str, content: &str) -> PathBuf {
		let path = self.dir.path().join(name);
		std::fs::write(&path, content).unwrap();
		path
	}

	pub fn run(&self, args: &[&str]) -> Output {
		let out_dir = self.out_dir();
		let mut cmd = Command::new(env!("CARGO_BIN_EXE_jira_report"));
		cmd.env_clear()
			.env("RUST_LOG", "debug")
			.env("JIRA_REPORT_TRACE_FILE", self.trace_file())
			.args(["--output-dir", out_dir.to_str().unwrap()])
			.args(args)
			.current_dir(self.dir.path());
		for (k, v) in &self.env {
			cmd.env(k, v);
		}
		cmd.output().unwrap()
	}

	pub fn trace(&self) -> TraceLog {
		TraceLog::from_file(&self.trace_file())
	}

	/// Report files written so far, by file name.
	pub fn reports(&self) -> Vec<String> {
		let mut names: Vec<String> = match std::fs::read_dir(self.out_dir()) {
			Ok(entries) => entries.map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect(),
			Err(_) => Vec::new(),
		};
		names.sort();
		names
	}
}
