//! Mock Jira client for testing purposes.
//!
//! Stores issues in memory and answers searches by interpreting the two query shapes the reports
//! build (due-date and development-status), so the whole pipeline can run without the real API.

use std::{path::PathBuf, sync::Mutex};

use async_trait::async_trait;
use jiff::civil::Date;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::{
	config::{JiraSettings, ReportSettings, Settings},
	error::FetchError,
	jira::{IssueSource, JiraFields, JiraIssue, JiraUser, Named, ParentRef},
};

/// Mock Jira client that stores all state in memory.
/// Thread-safe for use in async contexts.
#[derive(Default)]
pub struct MockJiraClient {
	issues: Mutex<Vec<JiraIssue>>,
	/// When set, every search fails with this status
	failure: Mutex<Option<reqwest::StatusCode>>,
	/// The JQL of every search, in order
	call_log: Mutex<Vec<String>>,
}

impl MockJiraClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_issue(&self, key: &str, type_name: &str, status: &str, due: Option<Date>, assignee: Option<&str>, parent: Option<&str>) {
		self.add_raw(JiraIssue {
			key: key.to_string(),
			fields: JiraFields {
				summary: format!("Summary of {key}"),
				issuetype: Some(Named { name: type_name.to_string() }),
				status: Some(Named { name: status.to_string() }),
				duedate: due,
				updated: None,
				assignee: assignee.map(|n| JiraUser { display_name: n.to_string() }),
				parent: parent.map(|p| ParentRef { key: p.to_string() }),
				description: None,
			},
		});
	}

	pub fn add_raw(&self, issue: JiraIssue) {
		self.issues.lock().unwrap().push(issue);
	}

	pub fn set_description(&self, key: &str, description: Value) {
		let mut issues = self.issues.lock().unwrap();
		if let Some(issue) = issues.iter_mut().find(|i| i.key == key) {
			issue.fields.description = Some(description);
		}
	}

	pub fn fail_with(&self, status: reqwest::StatusCode) {
		*self.failure.lock().unwrap() = Some(status);
	}

	pub fn get_call_log(&self) -> Vec<String> {
		self.call_log.lock().unwrap().clone()
	}

	fn matches(jql: &str, issue: &JiraIssue) -> bool {
		if jql.contains("duedate is not EMPTY") && issue.fields.duedate.is_none() {
			return false;
		}
		if jql.contains("status in (") {
			let status = issue.fields.status.as_ref().map(|s| s.name.as_str()).unwrap_or_default();
			return jql.contains(&format!("\"{status}\""));
		}
		true
	}
}

#[async_trait]
impl IssueSource for MockJiraClient {
	#[instrument(skip(self), name = "MockJiraClient::search")]
	async fn search(&self, jql: &str, fields: &[&str], max_results: u32) -> Result<Vec<JiraIssue>, FetchError> {
		tracing::info!(target: "mock_jira", jql, max_results, "search");
		self.call_log.lock().unwrap().push(jql.to_string());

		if let Some(status) = *self.failure.lock().unwrap() {
			return Err(FetchError::Status {
				status,
				body: "mock failure".to_string(),
			});
		}

		let issues = self.issues.lock().unwrap();
		Ok(issues.iter().filter(|i| Self::matches(jql, i)).take(max_results as usize).cloned().collect())
	}
}

/// Settings pointing at a fake tracker, writing reports into `output_dir`.
pub fn mock_settings(output_dir: impl Into<PathBuf>) -> Settings {
	Settings {
		jira: JiraSettings {
			base_url: Url::parse("https://acme.atlassian.net").unwrap(),
			username: "pm@acme.io".to_string(),
			api_token: "token".to_string(),
			project_key: "ACME".to_string(),
			dev_statuses: vec!["In Progress".to_string(), "In Review".to_string()],
			max_results: 100,
		},
		reports: ReportSettings {
			output_dir: output_dir.into(),
			..ReportSettings::default()
		},
	}
}
