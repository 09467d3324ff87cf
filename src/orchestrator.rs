use std::path::{Path, PathBuf};

use derive_more::Display;
use jiff::Zoned;
use tracing::instrument;

use crate::{
	config::Settings,
	error::RenderError,
	jira::{IssueSource, QueryMode, fetch_issues},
	pdf::write_pdf,
	presentation::{Palette, StatusKeywords},
	report::{RenderContext, ReportDocument},
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReportSelection {
	#[default]
	All,
	Development,
	Weekly,
}

impl ReportSelection {
	fn development(self) -> bool {
		matches!(self, ReportSelection::All | ReportSelection::Development)
	}

	fn weekly(self) -> bool {
		matches!(self, ReportSelection::All | ReportSelection::Weekly)
	}
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ReportKind {
	#[display("development status")]
	Development,
	#[display("weekly due dates")]
	Weekly,
}

/// What a run produced. Failures here have already been logged.
#[derive(Debug, Default)]
pub struct RunSummary {
	pub written: Vec<(ReportKind, PathBuf)>,
	pub failed: Vec<(ReportKind, String)>,
	pub skipped: Vec<ReportKind>,
}

impl RunSummary {
	fn record(&mut self, kind: ReportKind, result: Result<PathBuf, RenderError>) {
		match result {
			Ok(path) => self.written.push((kind, path)),
			Err(e) => {
				tracing::error!(report = %kind, error = %e, "failed to generate report");
				self.failed.push((kind, e.to_string()));
			}
		}
	}
}

/// Development report first, always attempted; then the weekly report, if anything is due.
#[instrument(skip(settings, source, now))]
pub async fn run(settings: &Settings, source: &dyn IssueSource, selection: ReportSelection, now: &Zoned) -> RunSummary {
	let palette = Palette::default();
	let keywords = StatusKeywords::default();
	let ctx = RenderContext::new(&settings.jira, &palette, &keywords, now.date());
	let generated = now.strftime("%Y-%m-%d %H:%M").to_string();

	let mut summary = RunSummary::default();

	if selection.development() {
		let issues = fetch_issues(source, &settings.jira, QueryMode::InDevelopment).await;
		let doc = ctx.development_status(&issues, &generated);
		let result = render(doc, settings.reports.dev_report_path()).await;
		summary.record(ReportKind::Development, result);
	}

	if selection.weekly() {
		let issues = fetch_issues(source, &settings.jira, QueryMode::DueDates).await;
		if issues.is_empty() {
			tracing::info!("no issues with due dates, skipping the weekly report");
			summary.skipped.push(ReportKind::Weekly);
		} else {
			let doc = ctx.weekly_due_dates(&issues, &generated);
			let result = render(doc, settings.reports.weekly_report_path()).await;
			summary.record(ReportKind::Weekly, result);
		}
	}

	summary
}

/// Paints the document on the blocking pool and waits for the file to be finished.
async fn render(doc: ReportDocument, path: PathBuf) -> Result<PathBuf, RenderError> {
	let title = doc.title.clone();
	let (path, pages) = tokio::task::spawn_blocking(move || -> Result<(PathBuf, usize), RenderError> {
		ensure_parent(&path)?;
		let pages = write_pdf(&doc, &path)?;
		Ok((path, pages))
	})
	.await??;
	tracing::info!(report = %title, path = %path.display(), pages, "report written");
	Ok(path)
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
	match path.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
		_ => Ok(()),
	}
}
