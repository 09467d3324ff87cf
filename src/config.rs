use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use smart_default::SmartDefault;
use url::Url;

use crate::error::ConfigError;

/// Prefix of every environment variable the report reads, e.g. `JIRA_BASE_URL`.
pub const ENV_PREFIX: &str = "JIRA";

#[derive(Clone, Debug)]
pub struct Settings {
	pub jira: JiraSettings,
	pub reports: ReportSettings,
}

#[derive(Clone, Debug)]
pub struct JiraSettings {
	pub base_url: Url,
	pub username: String,
	pub api_token: String,
	pub project_key: String,
	/// Status names that count as "in development", both for the dev query and for highlighting.
	pub dev_statuses: Vec<String>,
	pub max_results: u32,
}

impl JiraSettings {
	pub fn browse_url(&self, key: &str) -> String {
		format!("{}/browse/{key}", self.base_url.as_str().trim_end_matches('/'))
	}

	pub fn is_dev_status(&self, status: &str) -> bool {
		self.dev_statuses.iter().any(|s| s.eq_ignore_ascii_case(status.trim()))
	}
}

#[derive(Clone, Debug, SmartDefault)]
pub struct ReportSettings {
	#[default(PathBuf::from("."))]
	pub output_dir: PathBuf,
	#[default(String::from("development_status_report.pdf"))]
	pub dev_report_file: String,
	#[default(String::from("weekly_due_dates_report.pdf"))]
	pub weekly_report_file: String,
}

impl ReportSettings {
	pub fn dev_report_path(&self) -> PathBuf {
		self.output_dir.join(&self.dev_report_file)
	}

	pub fn weekly_report_path(&self) -> PathBuf {
		self.output_dir.join(&self.weekly_report_file)
	}
}

/// Flat shape shared by the config file and the `JIRA_*` environment variables.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
struct RawSettings {
	base_url: Option<String>,
	username: Option<String>,
	api_token: Option<String>,
	project_key: Option<String>,
	#[default(default_dev_statuses())]
	#[serde(deserialize_with = "status_list")]
	dev_statuses: Vec<String>,
	#[default(100)]
	max_results: u32,
	output_dir: Option<PathBuf>,
	dev_report_file: Option<String>,
	weekly_report_file: Option<String>,
}

fn default_dev_statuses() -> Vec<String> {
	["In Progress", "In Development", "In Review", "Code Review"].into_iter().map(String::from).collect()
}

/// A TOML list, or a comma-separated string as it comes from `JIRA_DEV_STATUSES`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusList {
	Joined(String),
	List(Vec<String>),
}

fn status_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
	Ok(match StatusList::deserialize(deserializer)? {
		StatusList::Joined(s) => s.split(',').map(String::from).collect(),
		StatusList::List(list) => list,
	})
}

impl Settings {
	/// Load settings from an optional config file, overridden by `JIRA_*` environment variables.
	pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
		Self::load_with_env(config_path, config::Environment::with_prefix(ENV_PREFIX))
	}

	/// Values stay strings: credentials and keys like `00123` must reach the tracker verbatim.
	fn load_with_env(config_path: Option<&Path>, env: config::Environment) -> Result<Self, ConfigError> {
		let mut builder = config::Config::builder();
		if let Some(path) = config_path {
			builder = builder.add_source(config::File::from(path));
		}
		Self::from_config(builder.add_source(env).build()?)
	}

	pub fn from_config(config: config::Config) -> Result<Self, ConfigError> {
		let raw: RawSettings = config.try_deserialize()?;
		raw.resolve()
	}
}

impl RawSettings {
	fn resolve(self) -> Result<Settings, ConfigError> {
		let mut missing = Vec::new();
		let mut require = |value: Option<String>, name: &'static str| match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
			Some(v) => v,
			None => {
				missing.push(name);
				String::new()
			}
		};

		let base_url = require(self.base_url, "JIRA_BASE_URL");
		let username = require(self.username, "JIRA_USERNAME");
		let api_token = require(self.api_token, "JIRA_API_TOKEN");
		let project_key = require(self.project_key, "JIRA_PROJECT_KEY");
		if !missing.is_empty() {
			return Err(ConfigError::Missing { missing });
		}

		let base_url = Url::parse(&base_url).map_err(|source| ConfigError::InvalidBaseUrl { url: base_url.clone(), source })?;

		let dev_statuses: Vec<String> = self.dev_statuses.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();

		let defaults = ReportSettings::default();
		Ok(Settings {
			jira: JiraSettings {
				base_url,
				username,
				api_token,
				project_key,
				dev_statuses: if dev_statuses.is_empty() { default_dev_statuses() } else { dev_statuses },
				max_results: self.max_results,
			},
			reports: ReportSettings {
				output_dir: self.output_dir.unwrap_or(defaults.output_dir),
				dev_report_file: self.dev_report_file.unwrap_or(defaults.dev_report_file),
				weekly_report_file: self.weekly_report_file.unwrap_or(defaults.weekly_report_file),
			},
		})
	}
}
