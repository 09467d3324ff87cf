//! Periodic project reports from a Jira project: what is due week by week, and what is in development.
//!
//! The pipeline is fetch ([jira]) → group ([grouping]) → lay out ([report]) → paint ([pdf]),
//! sequenced by [orchestrator::run].

pub mod config;
pub mod description;
pub mod error;
pub mod grouping;
pub mod issue;
pub mod jira;
pub mod mock_jira;
pub mod orchestrator;
pub mod pdf;
pub mod presentation;
pub mod report;

pub use config::Settings;
pub use issue::{Issue, IssueType};
pub use jira::{IssueSource, QueryMode, fetch_issues};
pub use orchestrator::{ReportSelection, RunSummary, run};
