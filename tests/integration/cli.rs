use crate::{assert_traced, common::TestContext};

#[test]
fn test_missing_config_generates_nothing() {
	let ctx = TestContext::new().env("JIRA_BASE_URL", "https://acme.atlassian.net");
	let output = ctx.run(&[]);

	assert!(output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("JIRA_USERNAME"), "stderr: {stderr}");
	assert!(stderr.contains("JIRA_PROJECT_KEY"), "stderr: {stderr}");
	assert!(ctx.reports().is_empty());
	assert!(ctx.trace().searches().is_empty(), "no request may be made without full config");
}

#[test]
fn test_unreachable_tracker_still_writes_dev_report() {
	let ctx = TestContext::with_unreachable_tracker();
	let output = ctx.run(&[]);

	assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
	assert_eq!(ctx.reports(), vec!["development_status_report.pdf"]);

	let log = ctx.trace();
	let failures = log.with_message("failed to fetch issues");
	assert_eq!(failures.len(), 2);
	assert!(failures.iter().all(|e| e.fields.error.as_deref().is_some_and(|err| err.contains("request"))), "{failures:#?}");
	assert_traced!(log, "no issues with due dates, skipping the weekly report");
	let written = log.with_message("report written");
	assert_eq!(written.len(), 1);
	assert_eq!(written[0].fields.report.as_deref(), Some("Development Status Report"));

	let searches = log.searches();
	assert_eq!(searches.len(), 2);
	assert!(searches[0].contains("status in ("));
	assert!(searches[1].contains("duedate is not EMPTY"));

	let pdf = std::fs::read(ctx.out_dir().join("development_status_report.pdf")).unwrap();
	assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn test_weekly_only() {
	let ctx = TestContext::with_unreachable_tracker();
	let output = ctx.run(&["weekly"]);

	assert!(output.status.success());
	assert!(ctx.reports().is_empty());
	let searches = ctx.trace().searches().into_iter().map(String::from).collect::<Vec<_>>();
	assert_eq!(searches.len(), 1);
	assert!(searches[0].contains("duedate is not EMPTY"));
}

#[test]
fn test_config_file_with_env_override() {
	let ctx = TestContext::new();
	let config = ctx.write(
		"report.toml",
		r#"
base_url = "http://127.0.0.1:9"
username = "pm@acme.io"
api_token = "token"
project_key = "FROMFILE"
dev_statuses = ["Doing"]
"#,
	);
	let ctx = ctx.env("JIRA_PROJECT_KEY", "FROMENV");
	let output = ctx.run(&["--config", config.to_str().unwrap(), "dev"]);

	assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
	let log = ctx.trace();
	let searches = log.searches();
	assert_eq!(searches.len(), 1);
	assert!(searches[0].starts_with(r#"project = "FROMENV""#), "{}", searches[0]);
	assert!(searches[0].contains(r#"status in ("Doing")"#), "{}", searches[0]);
	assert_eq!(ctx.reports(), vec!["development_status_report.pdf"]);
}

#[test]
fn test_completions() {
	let ctx = TestContext::new();
	let output = ctx.run(&["completions", "bash"]);

	assert!(output.status.success());
	assert!(String::from_utf8_lossy(&output.stdout).contains("jira_report"));
	assert!(!ctx.path().join("reports").exists());
}
