use std::sync::Arc;

use async_trait::async_trait;
use jiff::civil::Date;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::{
	config::JiraSettings,
	error::FetchError,
	issue::{Issue, IssueType},
};

pub const SEARCH_PATH: &str = "/rest/api/3/search/jql";
pub const SEARCH_FIELDS: [&str; 8] = ["summary", "issuetype", "status", "duedate", "updated", "assignee", "parent", "description"];

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	#[serde(default)]
	pub issues: Vec<JiraIssue>,
	#[serde(default)]
	pub is_last: Option<bool>,
	#[serde(default)]
	pub next_page_token: Option<String>,
}

impl SearchResponse {
	/// More matches exist past this page. Only one page is ever requested.
	pub fn is_partial(&self) -> bool {
		self.is_last == Some(false) || self.next_page_token.is_some()
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct JiraIssue {
	pub key: String,
	pub fields: JiraFields,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct JiraFields {
	pub summary: String,
	pub issuetype: Option<Named>,
	pub status: Option<Named>,
	pub duedate: Option<Date>,
	/// Kept verbatim; the tracker's offset format (`+0000`) isn't RFC 3339.
	pub updated: Option<String>,
	pub assignee: Option<JiraUser>,
	pub parent: Option<ParentRef>,
	/// Plain string or rich-text document, see [Description](crate::description::Description).
	pub description: Option<Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Named {
	pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct JiraUser {
	#[serde(rename = "displayName")]
	pub display_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ParentRef {
	pub key: String,
}

/// Which slice of the project a report asks for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryMode {
	/// Every issue with a due date.
	DueDates,
	/// Issues in one of the development statuses, touched in the last 7 days.
	InDevelopment,
}

//==============================================================================
// Issue Source Trait
//==============================================================================

/// Search access to the issue tracker.
/// Implemented by the real HTTP client and by [MockJiraClient](crate::mock_jira::MockJiraClient).
#[async_trait]
pub trait IssueSource: Send + Sync {
	async fn search(&self, jql: &str, fields: &[&str], max_results: u32) -> Result<Vec<JiraIssue>, FetchError>;
}

pub type BoxedIssueSource = Arc<dyn IssueSource>;

//==============================================================================
// Real Jira Client Implementation
//==============================================================================

pub struct RealJiraClient {
	http_client: Client,
	base_url: String,
	username: String,
	api_token: String,
}

impl RealJiraClient {
	pub fn new(settings: &JiraSettings) -> Self {
		Self {
			http_client: Client::new(),
			base_url: settings.base_url.as_str().trim_end_matches('/').to_string(),
			username: settings.username.clone(),
			api_token: settings.api_token.clone(),
		}
	}

	fn search_url(&self, jql: &str, fields: &[&str], max_results: u32) -> String {
		format!(
			"{}{SEARCH_PATH}?jql={}&maxResults={max_results}&fields={}",
			self.base_url,
			urlencoding::encode(jql),
			urlencoding::encode(&fields.join(","))
		)
	}
}

#[async_trait]
impl IssueSource for RealJiraClient {
	async fn search(&self, jql: &str, fields: &[&str], max_results: u32) -> Result<Vec<JiraIssue>, FetchError> {
		let res = self
			.http_client
			.get(self.search_url(jql, fields, max_results))
			.header("Accept", "application/json")
			.basic_auth(&self.username, Some(&self.api_token))
			.send()
			.await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			return Err(FetchError::Status { status, body });
		}

		let body = res.text().await?;
		let response: SearchResponse = serde_json::from_str(&body)?;
		if response.is_partial() {
			tracing::warn!(returned = response.issues.len(), max_results, "search matched more issues than requested, report is partial");
		}
		Ok(response.issues)
	}
}

pub fn create_client(settings: &JiraSettings) -> BoxedIssueSource {
	Arc::new(RealJiraClient::new(settings))
}

//==============================================================================
// Queries
//==============================================================================

fn quote(s: &str) -> String {
	format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn build_jql(mode: QueryMode, settings: &JiraSettings) -> String {
	let types = IssueType::ALL.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ");
	let base = format!("project = {} AND issuetype in ({types})", quote(&settings.project_key));
	match mode {
		QueryMode::DueDates => format!("{base} AND duedate is not EMPTY ORDER BY duedate ASC"),
		QueryMode::InDevelopment => {
			let statuses = settings.dev_statuses.iter().map(|s| quote(s)).collect::<Vec<_>>().join(", ");
			format!("{base} AND status in ({statuses}) AND (updated >= -7d OR created >= -7d) ORDER BY updated DESC")
		}
	}
}

/// Run one search and convert the results. Failures are logged and yield no issues.
#[instrument(skip(source, settings))]
pub async fn fetch_issues(source: &dyn IssueSource, settings: &JiraSettings, mode: QueryMode) -> Vec<Issue> {
	let jql = build_jql(mode, settings);
	tracing::debug!(%jql, "searching issues");

	let raw = match source.search(&jql, &SEARCH_FIELDS, settings.max_results).await {
		Ok(raw) => raw,
		Err(e) => {
			tracing::error!(error = %e, "failed to fetch issues");
			return Vec::new();
		}
	};

	let issues: Vec<Issue> = raw
		.into_iter()
		.filter_map(|r| match Issue::try_from(r) {
			Ok(issue) => Some(issue),
			Err(e) => {
				tracing::warn!("skipping: {e}");
				None
			}
		})
		.collect();
	tracing::info!(count = issues.len(), "fetched issues");
	issues
}
