//! Partitioning issues for the reports. Everything here is pure and borrows the fetched issues.

use std::collections::{BTreeMap, HashMap};

use jiff::{ToSpan, civil::Date};

use crate::{issue::Issue, presentation::week_start};

/// Week start (a Monday) to the issues due that week, in fetch order.
pub type WeekBuckets<'a> = BTreeMap<Date, Vec<&'a Issue>>;

/// Assignee display name (or [UNASSIGNED](crate::issue::UNASSIGNED)) to their issues, sorted by name.
pub type AssigneeBuckets<'a> = BTreeMap<String, Vec<&'a Issue>>;

#[derive(Clone, Debug, PartialEq)]
pub struct EpicBucket<'a> {
	pub epic: &'a Issue,
	pub children: Vec<&'a Issue>,
}

/// Issues grouped under the epics found in the same input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpicGroups<'a> {
	/// In order of first appearance.
	pub epics: Vec<EpicBucket<'a>>,
	/// Issues whose parent is absent or not one of `epics`.
	pub unassigned: Vec<&'a Issue>,
}

impl EpicGroups<'_> {
	pub fn is_empty(&self) -> bool {
		self.epics.is_empty() && self.unassigned.is_empty()
	}
}

/// Issues without a due date are left out.
pub fn group_by_week<'a, I>(issues: I) -> WeekBuckets<'a>
where
	I: IntoIterator<Item = &'a Issue>, {
	let mut weeks = WeekBuckets::new();
	for issue in issues {
		if let Some(due) = issue.due_date {
			weeks.entry(week_start(due)).or_default().push(issue);
		}
	}
	weeks
}

pub fn group_by_assignee<'a, I>(issues: I) -> AssigneeBuckets<'a>
where
	I: IntoIterator<Item = &'a Issue>, {
	let mut assignees = AssigneeBuckets::new();
	for issue in issues {
		assignees.entry(issue.assignee_name().to_string()).or_default().push(issue);
	}
	assignees
}

/// A parent link only counts when the parent is one of the epics in `issues`.
pub fn group_by_epic<'a, I>(issues: I) -> EpicGroups<'a>
where
	I: IntoIterator<Item = &'a Issue>, {
	let (epics, others): (Vec<&Issue>, Vec<&Issue>) = issues.into_iter().partition(|i| i.is_epic());

	let mut groups = EpicGroups::default();
	let mut index: HashMap<&str, usize> = HashMap::new();
	for epic in epics {
		if index.contains_key(epic.key.as_str()) {
			tracing::warn!(key = %epic.key, "duplicate epic in input, keeping the first");
			continue;
		}
		index.insert(epic.key.as_str(), groups.epics.len());
		groups.epics.push(EpicBucket { epic, children: Vec::new() });
	}

	for issue in others {
		match issue.parent.as_deref().and_then(|p| index.get(p)) {
			Some(&i) => groups.epics[i].children.push(issue),
			None => groups.unassigned.push(issue),
		}
	}
	groups
}

/// Keep the current week, the two before it, and every future week.
pub fn filter_weeks<'a>(weeks: WeekBuckets<'a>, today: Date) -> WeekBuckets<'a> {
	let current = week_start(today);
	let previous = current.saturating_sub(1.weeks());
	let before_previous = current.saturating_sub(2.weeks());
	weeks
		.into_iter()
		.filter(|(start, _)| *start == current || *start == previous || *start == before_previous || *start > current)
		.collect()
}
