//! Mapping issue attributes to what the reports show: status categories, colors and week labels.
//!
//! The lookup tables here are built once at startup and handed around by reference.

use std::collections::HashMap;

use derive_more::Display;
use jiff::{ToSpan, civil::Date};

use crate::issue::IssueType;

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum StatusCategory {
	#[display("backlog")]
	Backlog,
	#[display("inProgress")]
	InProgress,
	#[display("done")]
	Done,
}

impl StatusCategory {
	pub fn label(self) -> &'static str {
		match self {
			StatusCategory::Backlog => "Backlog",
			StatusCategory::InProgress => "In Progress",
			StatusCategory::Done => "Done",
		}
	}
}

/// Lower-case substrings that put a status name into a category.
#[derive(Clone, Debug)]
pub struct StatusKeywords {
	/// Checked in order; the first category with a matching keyword wins.
	lists: Vec<(StatusCategory, Vec<String>)>,
}

impl Default for StatusKeywords {
	fn default() -> Self {
		let list = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
		Self {
			lists: vec![
				(StatusCategory::Backlog, list(&["backlog", "to do", "todo", "open", "new", "selected"])),
				(StatusCategory::InProgress, list(&["progress", "review", "develop", "testing", "qa", "blocked"])),
				(StatusCategory::Done, list(&["done", "closed", "resolved", "deployed", "released", "complete"])),
			],
		}
	}
}

impl StatusKeywords {
	pub fn classify(&self, status: &str) -> StatusCategory {
		let status = status.to_lowercase();
		self.lists
			.iter()
			.find(|(_, words)| words.iter().any(|w| status.contains(w.as_str())))
			.map(|(category, _)| *category)
			.unwrap_or(StatusCategory::Backlog)
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, derive_new::new)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
}

#[derive(Clone, Debug)]
pub struct Palette {
	status: HashMap<StatusCategory, Rgb>,
	issue_type: HashMap<IssueType, Rgb>,
	/// Delayed suffix, missing descriptions, overdue dates.
	pub alert: Rgb,
	/// Status lines of issues in one of the configured development statuses.
	pub in_development: Rgb,
	pub text: Rgb,
	pub muted: Rgb,
	pub current_week: Rgb,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			status: HashMap::from([
				(StatusCategory::Backlog, Rgb::new(128, 128, 128)),
				(StatusCategory::InProgress, Rgb::new(0, 102, 204)),
				(StatusCategory::Done, Rgb::new(0, 153, 51)),
			]),
			issue_type: HashMap::from([
				(IssueType::Epic, Rgb::new(101, 84, 192)),
				(IssueType::Story, Rgb::new(54, 179, 126)),
				(IssueType::Task, Rgb::new(0, 82, 204)),
				(IssueType::Bug, Rgb::new(222, 53, 11)),
			]),
			alert: Rgb::new(204, 0, 0),
			in_development: Rgb::new(255, 140, 0),
			text: Rgb::new(33, 33, 33),
			muted: Rgb::new(90, 90, 90),
			current_week: Rgb::new(255, 243, 176),
		}
	}
}

impl Palette {
	pub fn status_color(&self, category: StatusCategory) -> Rgb {
		self.status.get(&category).copied().unwrap_or(Rgb::BLACK)
	}

	pub fn type_color(&self, issue_type: IssueType) -> Rgb {
		self.issue_type.get(&issue_type).copied().unwrap_or(Rgb::BLACK)
	}

	/// Legend entries in a fixed order.
	pub fn legend(&self) -> Vec<(StatusCategory, Rgb)> {
		[StatusCategory::Backlog, StatusCategory::InProgress, StatusCategory::Done]
			.into_iter()
			.map(|c| (c, self.status_color(c)))
			.collect()
	}
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: Date) -> Date {
	let offset = i64::from(date.weekday().to_monday_zero_offset());
	date.saturating_sub(offset.days())
}

/// `Week 20 (13-05-2024 to 19-05-2024)`
pub fn week_title(week_start: Date) -> String {
	let end = week_start.saturating_add(6.days());
	format!(
		"Week {} ({} to {})",
		week_start.iso_week_date().week(),
		week_start.strftime("%d-%m-%Y"),
		end.strftime("%d-%m-%Y")
	)
}

pub fn format_due(due: Option<Date>) -> String {
	match due {
		Some(d) => format!("Due: {}", d.strftime("%d-%m-%Y")),
		None => "Due: not set".to_string(),
	}
}
