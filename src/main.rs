use std::{path::PathBuf, sync::Mutex};

use clap::{CommandFactory, Parser, Subcommand};
use color_eyre::eyre::Result;
use jira_report::{ReportSelection, Settings, jira::create_client, run};
use jiff::Zoned;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
struct Cli {
	/// TOML file with the same keys as the JIRA_* environment variables, which take precedence
	#[arg(long)]
	config: Option<PathBuf>,
	/// Directory the reports are written to
	#[arg(long)]
	output_dir: Option<PathBuf>,
	#[command(subcommand)]
	command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
	/// Both reports, development status first (default)
	All,
	/// Development status report only
	Dev,
	/// Weekly due-dates report only
	Weekly,
	/// Print shell completions
	Completions { shell: clap_complete::Shell },
}

/// `RUST_LOG`, else the directives baked in at build time, else `info`.
/// With `JIRA_REPORT_TRACE_FILE` set, events are also written there as JSON lines.
fn init_tracing() -> Result<()> {
	let directives = std::env::var("RUST_LOG")
		.ok()
		.or_else(|| option_env!("LOG_DIRECTIVES").map(String::from))
		.unwrap_or_else(|| "info".to_string());

	let json_layer = match std::env::var("JIRA_REPORT_TRACE_FILE") {
		Ok(path) => Some(fmt::layer().json().with_writer(Mutex::new(std::fs::File::create(path)?))),
		Err(_) => None,
	};

	tracing_subscriber::registry()
		.with(EnvFilter::new(directives))
		.with(fmt::layer().with_writer(std::io::stderr).with_target(false))
		.with(json_layer)
		.init();
	Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	let cli = Cli::parse();

	let selection = match cli.command.unwrap_or(Commands::All) {
		Commands::All => ReportSelection::All,
		Commands::Dev => ReportSelection::Development,
		Commands::Weekly => ReportSelection::Weekly,
		Commands::Completions { shell } => {
			clap_complete::generate(shell, &mut Cli::command(), "jira_report", &mut std::io::stdout());
			return Ok(());
		}
	};

	init_tracing()?;

	let mut settings = match Settings::load(cli.config.as_deref()) {
		Ok(settings) => settings,
		Err(e) => {
			tracing::error!(error = %e, "invalid configuration, no reports generated");
			eprintln!("{:?}", miette::Report::new(e));
			return Ok(());
		}
	};
	if let Some(dir) = cli.output_dir {
		settings.reports.output_dir = dir;
	}

	let client = create_client(&settings.jira);
	let summary = run(&settings, client.as_ref(), selection, &Zoned::now()).await;

	for (kind, path) in &summary.written {
		tracing::info!(report = %kind, path = %path.display(), "done");
	}
	for kind in &summary.skipped {
		tracing::info!(report = %kind, "skipped");
	}
	if !summary.failed.is_empty() {
		tracing::warn!(failed = summary.failed.len(), "some reports could not be generated");
	}
	Ok(())
}
