//! Error types for the three failure families of a report run.
//!
//! Configuration errors are fatal and abort the run before any request is made.
//! Fetch and render errors are recovered: they are logged and only affect the report they belong to.

#![allow(unused_assignments)] // Fields are read by miette's derive macro via attributes

use miette::Diagnostic;

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum ConfigError {
	#[error("missing required configuration: {}", .missing.join(", "))]
	#[diagnostic(
		code(jira_report::config::missing),
		help("set the environment variables (or the matching keys in the --config file): JIRA_BASE_URL, JIRA_USERNAME, JIRA_API_TOKEN, JIRA_PROJECT_KEY")
	)]
	Missing { missing: Vec<&'static str> },

	#[error("base URL `{url}` is not a valid URL: {source}")]
	#[diagnostic(code(jira_report::config::invalid_base_url), help("expected something like https://your-company.atlassian.net"))]
	InvalidBaseUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	#[error("failed to load configuration: {0}")]
	#[diagnostic(code(jira_report::config::load))]
	Load(#[from] config::ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
	#[error("request to the issue tracker failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("issue tracker responded with {status}: {body}")]
	Status { status: reqwest::StatusCode, body: String },

	#[error("could not decode search response: {0}")]
	Decode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	#[error("could not write report file: {0}")]
	Io(#[from] std::io::Error),

	#[error("pdf backend failed: {0}")]
	Pdf(String),

	#[error("render task did not complete: {0}")]
	Join(#[from] tokio::task::JoinError),
}
