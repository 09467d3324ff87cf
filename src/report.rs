//! Report layouts.
//!
//! A report is first laid out as a flat list of [Block]s, then painted by [pdf](crate::pdf).
//! Keeping the layout separate lets the ordering rules be tested without looking inside a PDF.

use jiff::civil::Date;

use crate::{
	config::JiraSettings,
	description::{DESCRIPTION_PLACEHOLDER, description_text},
	grouping::{EpicGroups, filter_weeks, group_by_assignee, group_by_epic, group_by_week},
	issue::Issue,
	presentation::{Palette, Rgb, StatusKeywords, format_due, week_start, week_title},
};

pub const WEEKLY_TITLE: &str = "Weekly Due Dates Report";
pub const DEV_TITLE: &str = "Development Status Report";
pub const DELAYED_SUFFIX: &str = " (DELAYED)";

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
	pub text: String,
	pub color: Rgb,
}

impl Line {
	fn new(text: impl Into<String>, color: Rgb) -> Self {
		Self { text: text.into(), color }
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct IssueBlock {
	pub key: String,
	/// Nesting under an epic heading.
	pub indent: u8,
	pub dot: Rgb,
	/// `[Type] KEY`, linked to `url`.
	pub title: Line,
	pub url: String,
	pub summary: Line,
	/// The `(DELAYED)` suffix, present when the issue is overdue.
	pub delayed: Option<Line>,
	pub status: Line,
	pub description: Line,
	pub due: Line,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
	/// `highlight` is set for the current week.
	Week { title: Line, highlight: Option<Rgb> },
	Assignee(Line),
	Epic(Line),
	Issue(IssueBlock),
	Note(Line),
	Rule,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportDocument {
	pub title: String,
	pub generated: Line,
	pub legend: Vec<Line>,
	pub blocks: Vec<Block>,
}

impl ReportDocument {
	pub fn issue_keys(&self) -> Vec<&str> {
		self.blocks
			.iter()
			.filter_map(|b| match b {
				Block::Issue(i) => Some(i.key.as_str()),
				_ => None,
			})
			.collect()
	}
}

/// Everything a layout needs besides the issues themselves.
#[derive(Clone, Copy, Debug, derive_new::new)]
pub struct RenderContext<'a> {
	pub jira: &'a JiraSettings,
	pub palette: &'a Palette,
	pub keywords: &'a StatusKeywords,
	pub today: Date,
}

impl RenderContext<'_> {
	fn issue_block(&self, issue: &Issue, indent: u8) -> IssueBlock {
		let palette = self.palette;
		let category = issue.status_category(self.keywords);
		let delayed = issue.is_delayed(self.today, self.keywords);
		let status_color = if self.jira.is_dev_status(&issue.status) { palette.in_development } else { palette.muted };
		let (description, description_color) = match description_text(issue.description.as_ref()) {
			Some(text) => (text, palette.text),
			None => (DESCRIPTION_PLACEHOLDER.to_string(), palette.alert),
		};
		let due_color = if delayed { palette.alert } else { palette.muted };

		IssueBlock {
			key: issue.key.clone(),
			indent,
			dot: palette.status_color(category),
			title: Line::new(format!("[{}] {}", issue.issue_type, issue.key), palette.type_color(issue.issue_type)),
			url: self.jira.browse_url(&issue.key),
			summary: Line::new(format!("- {}", issue.summary), palette.text),
			delayed: delayed.then(|| Line::new(DELAYED_SUFFIX, palette.alert)),
			status: Line::new(format!("Status: {}", issue.status), status_color),
			description: Line::new(format!("Description: {description}"), description_color),
			due: Line::new(format_due(issue.due_date), due_color),
		}
	}

	fn push_epic_groups(&self, groups: &EpicGroups<'_>, blocks: &mut Vec<Block>) {
		for bucket in &groups.epics {
			let epic = bucket.epic;
			blocks.push(Block::Epic(Line::new(format!("Epic: {} - {}", epic.key, epic.summary), self.palette.type_color(epic.issue_type))));
			blocks.push(Block::Issue(self.issue_block(epic, 0)));
			for child in &bucket.children {
				blocks.push(Block::Issue(self.issue_block(child, 1)));
			}
		}
		for issue in &groups.unassigned {
			blocks.push(Block::Issue(self.issue_block(issue, 0)));
		}
	}

	fn push_by_assignee<'i, I>(&self, issues: I, blocks: &mut Vec<Block>)
	where
		I: IntoIterator<Item = &'i Issue>, {
		for (assignee, assigned) in group_by_assignee(issues) {
			blocks.push(Block::Assignee(Line::new(assignee, self.palette.text)));
			self.push_epic_groups(&group_by_epic(assigned), blocks);
		}
	}

	fn document(&self, title: &str, generated: &str, blocks: Vec<Block>) -> ReportDocument {
		ReportDocument {
			title: title.to_string(),
			generated: Line::new(format!("Generated: {generated}"), self.palette.muted),
			legend: self.palette.legend().into_iter().map(|(category, color)| Line::new(category.label(), color)).collect(),
			blocks,
		}
	}

	/// Weeks ascending, then assignees alphabetically, then epic buckets.
	pub fn weekly_due_dates(&self, issues: &[Issue], generated: &str) -> ReportDocument {
		let weeks = filter_weeks(group_by_week(issues), self.today);
		let current = week_start(self.today);

		let mut blocks = Vec::new();
		for (i, (start, week_issues)) in weeks.iter().enumerate() {
			if i > 0 {
				blocks.push(Block::Rule);
			}
			blocks.push(Block::Week {
				title: Line::new(week_title(*start), self.palette.text),
				highlight: (*start == current).then_some(self.palette.current_week),
			});
			self.push_by_assignee(week_issues.iter().copied(), &mut blocks);
		}
		if weeks.is_empty() {
			blocks.push(Block::Note(Line::new("No issues are due in the reported weeks.", self.palette.muted)));
		}
		self.document(WEEKLY_TITLE, generated, blocks)
	}

	pub fn development_status(&self, issues: &[Issue], generated: &str) -> ReportDocument {
		let mut blocks = Vec::new();
		self.push_by_assignee(issues, &mut blocks);
		if issues.is_empty() {
			blocks.push(Block::Note(Line::new("No issues are currently in development.", self.palette.muted)));
		}
		self.document(DEV_TITLE, generated, blocks)
	}
}
