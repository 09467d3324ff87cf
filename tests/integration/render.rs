use jira_report::{
	Issue, IssueType,
	description::Description,
	mock_jira::mock_settings,
	pdf::write_pdf,
	presentation::{Palette, StatusKeywords},
	report::{Block, RenderContext},
};
use jiff::civil::date;

fn issues(n: usize) -> Vec<Issue> {
	(0..n)
		.map(|i| Issue {
			key: format!("ACME-{i}"),
			issue_type: IssueType::ALL[i % 4],
			summary: format!("Issue number {i} with a summary long enough to need wrapping on an A4 page once the indent is taken away"),
			description: (i % 3 != 0).then(|| Description::Plain("word ".repeat(60))),
			status: ["To Do", "In Progress", "Done"][i % 3].to_string(),
			due_date: Some(date(2024, 5, 6 + (i % 20) as i8)),
			updated: None,
			assignee: Some(["Ada", "Grace", "Linus"][i % 3].to_string()),
			parent: None,
		})
		.collect()
}

#[test]
fn test_weekly_report_spans_pages() {
	let dir = tempfile::tempdir().unwrap();
	let settings = mock_settings(dir.path());
	let palette = Palette::default();
	let keywords = StatusKeywords::default();
	let ctx = RenderContext::new(&settings.jira, &palette, &keywords, date(2024, 5, 15));

	let issues = issues(60);
	let doc = ctx.weekly_due_dates(&issues, "2024-05-15 10:30");
	assert_eq!(doc.blocks.iter().filter(|b| matches!(b, Block::Week { .. })).count(), 3);
	assert_eq!(doc.issue_keys().len(), 60);

	let path = settings.reports.weekly_report_path();
	let pages = write_pdf(&doc, &path).unwrap();
	assert!(pages > 1, "60 issues should not fit on one page");
	assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}

#[test]
fn test_empty_development_report() {
	let dir = tempfile::tempdir().unwrap();
	let settings = mock_settings(dir.path());
	let palette = Palette::default();
	let keywords = StatusKeywords::default();
	let ctx = RenderContext::new(&settings.jira, &palette, &keywords, date(2024, 5, 15));

	let doc = ctx.development_status(&[], "2024-05-15 10:30");
	let pages = write_pdf(&doc, &settings.reports.dev_report_path()).unwrap();
	assert_eq!(pages, 1);
}

#[test]
fn test_text_outside_latin1_still_renders() {
	let dir = tempfile::tempdir().unwrap();
	let settings = mock_settings(dir.path());
	let palette = Palette::default();
	let keywords = StatusKeywords::default();
	let ctx = RenderContext::new(&settings.jira, &palette, &keywords, date(2024, 5, 15));

	let issues: Vec<Issue> = issues(2)
		.into_iter()
		.map(|i| Issue {
			summary: "日本語 🚀 王".to_string(),
			status: "In Progress".to_string(),
			assignee: Some("王".to_string()),
			..i
		})
		.collect();
	let doc = ctx.development_status(&issues, "2024-05-15 10:30");
	let path = settings.reports.dev_report_path();
	let pages = write_pdf(&doc, &path).unwrap();
	assert_eq!(pages, 1);
	assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}
