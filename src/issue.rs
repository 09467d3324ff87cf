use derive_more::Display;
use jiff::civil::Date;

use crate::{
	description::Description,
	jira::JiraIssue,
	presentation::{StatusCategory, StatusKeywords},
};

/// Label used for issues with no assignee, and for the epic bucket of issues with no known epic.
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum IssueType {
	Epic,
	Story,
	Task,
	Bug,
}

impl IssueType {
	pub const ALL: [IssueType; 4] = [IssueType::Epic, IssueType::Story, IssueType::Task, IssueType::Bug];

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|t| t.to_string().eq_ignore_ascii_case(name.trim()))
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Issue {
	pub key: String,
	pub issue_type: IssueType,
	pub summary: String,
	pub description: Option<Description>,
	pub status: String,
	pub due_date: Option<Date>,
	pub updated: Option<String>,
	pub assignee: Option<String>,
	/// Key of the parent issue, whatever its type.
	pub parent: Option<String>,
}

impl Issue {
	pub fn assignee_name(&self) -> &str {
		self.assignee.as_deref().unwrap_or(UNASSIGNED)
	}

	pub fn is_epic(&self) -> bool {
		self.issue_type == IssueType::Epic
	}

	pub fn status_category(&self, keywords: &StatusKeywords) -> StatusCategory {
		keywords.classify(&self.status)
	}

	/// Due strictly before `today` and not in a done-like status.
	pub fn is_delayed(&self, today: Date, keywords: &StatusKeywords) -> bool {
		match self.due_date {
			Some(due) => due < today && self.status_category(keywords) != StatusCategory::Done,
			None => false,
		}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("issue {key} has unsupported type `{type_name}`")]
pub struct UnsupportedIssueType {
	pub key: String,
	pub type_name: String,
}

impl TryFrom<JiraIssue> for Issue {
	type Error = UnsupportedIssueType;

	fn try_from(raw: JiraIssue) -> Result<Self, Self::Error> {
		let fields = raw.fields;
		let type_name = fields.issuetype.map(|t| t.name).unwrap_or_default();
		let issue_type = IssueType::from_name(&type_name).ok_or_else(|| UnsupportedIssueType {
			key: raw.key.clone(),
			type_name: type_name.clone(),
		})?;

		Ok(Self {
			key: raw.key,
			issue_type,
			summary: fields.summary,
			description: fields.description.as_ref().and_then(Description::from_value),
			status: fields.status.map(|s| s.name).unwrap_or_default(),
			due_date: fields.duedate,
			updated: fields.updated,
			assignee: fields.assignee.map(|a| a.display_name).filter(|n| !n.trim().is_empty()),
			parent: fields.parent.map(|p| p.key),
		})
	}
}
